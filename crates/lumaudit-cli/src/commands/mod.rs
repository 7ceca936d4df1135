//! Command implementations for the lumaudit CLI.

mod analyze;
mod build;
mod run;

// Re-export all command functions
pub use analyze::cmd_analyze;
pub use build::cmd_build;
pub use run::cmd_run;
