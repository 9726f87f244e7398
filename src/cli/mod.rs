//! CLI module for bookingdb
//!
//! Provides command-line interface for:
//! - query: filter and sort the bookings in the data file
//! - explain: print the parsed filter and sort
//! - check: validate config and data file

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, execute, explain, query, run_command};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(&cli.command)
}
