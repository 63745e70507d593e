pub mod connection;
pub mod content;
pub mod device;
pub mod engine;
pub mod range;

pub use crate::domain::model::{ConnectionSignal, Placement, Signals};
pub use crate::domain::ports::SignalSource;
pub use crate::utils::error::Result;
