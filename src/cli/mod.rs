//! CLI layer for the reminders tool.
//!
//! Provides the command-line interface using clap, with commands for
//! listing, creating, editing and deleting lists and reminders.

pub mod commands;
pub mod parser;

pub use commands::{execute, run};
pub use parser::{Cli, Commands, FieldArgs, FilterArgs};
