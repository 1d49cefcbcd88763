//! Line-oriented shell over [`FinanceTracker`](crate::core::FinanceTracker).
//!
//! Runs interactively through `rustyline`, or reads commands from stdin when
//! `FINWELL_CLI_SCRIPT` is set.

mod commands;
mod context;
pub mod output;
mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError};
pub use shell::{run_cli, SCRIPT_ENV};
