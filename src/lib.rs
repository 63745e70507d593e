pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::rule_table::RuleTable;
pub use crate::core::connection::{classify_connection, ConnectionSpeed};
pub use crate::core::content::has_video;
pub use crate::core::device::{classify_device, DeviceClass};
pub use crate::core::engine::{
    adjusted_timeout, calculate_timeout_modifier, evaluate, Axis, ModifierBreakdown,
    TimeoutModifier,
};
pub use crate::core::range::{match_count, CountKey};
pub use crate::domain::model::{ConnectionSignal, Placement, Signals};
pub use crate::domain::ports::SignalSource;
pub use crate::utils::error::{Result, TimeoutError};
