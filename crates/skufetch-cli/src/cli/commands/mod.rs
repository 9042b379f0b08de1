//! CLI command handlers, one file per command.

mod config;
mod prepare;
mod run;

pub use config::run_show_config;
pub use prepare::run_prepare;
pub use run::run_fetch;
