//! CLI argument definitions using clap
//!
//! Commands:
//! - bookingdb query --config <path> [--filter <expr>] [--sort <expr>]
//! - bookingdb explain --config <path> [--filter <expr>] [--sort <expr>]
//! - bookingdb check --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bookingdb - filter and sort bookings with a small expression language
#[derive(Parser, Debug)]
#[command(name = "bookingdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run a filter/sort query over the data file
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./bookingdb.json")]
        config: PathBuf,

        /// Filter expression, e.g. "hotelName eq 'Hilton' AND checkIn gte '2024-06-01'"
        #[arg(long)]
        filter: Option<String>,

        /// Sort expression, e.g. "checkIn DESC,guestName"
        #[arg(long)]
        sort: Option<String>,
    },

    /// Show the parsed filter and sort without running them
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./bookingdb.json")]
        config: PathBuf,

        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        sort: Option<String>,
    },

    /// Validate the configuration and data file
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./bookingdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
