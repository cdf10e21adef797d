//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod classify;
pub mod config;
pub mod replay;
pub mod watch;

pub use classify::run_classify;
pub use config::run_config;
pub use replay::run_replay;
pub use watch::run_watch;
