//! CLI module for stocksync
//!
//! Provides command-line interface for:
//! - init: create the database file and schema
//! - start: boot the server and enter the serving loop
//! - add-user: provision a login credential

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{add_user, init, run_command, start};
pub use errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
