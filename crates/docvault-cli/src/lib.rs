//! docvault command line library.
//!
//! - `cli`: argument parsing with clap
//! - `commands`: settings, logging and command implementations

pub mod cli;
pub mod commands;

pub use cli::{AdminCommands, Cli, Commands, DocumentCommands, ShareCommands, TagCommands};
pub use commands::{execute, init_logging, load_settings, parse_create_date, run};
