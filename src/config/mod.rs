#[cfg(feature = "cli")]
pub mod cli;
pub mod rule_table;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
