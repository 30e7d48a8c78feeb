//! CLI argument definitions using clap
//!
//! Commands:
//! - stocksync init --config <path>
//! - stocksync start --config <path>
//! - stocksync add-user --config <path> <user_name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stocksync - incremental change-sync server for a stock inventory
#[derive(Parser, Debug)]
#[command(name = "stocksync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./stocksync.json")]
        config: PathBuf,
    },

    /// Start the sync server
    Start {
        /// Path to configuration file
        #[arg(long, default_value = "./stocksync.json")]
        config: PathBuf,
    },

    /// Create a login user with a fresh salt
    AddUser {
        /// Path to configuration file
        #[arg(long, default_value = "./stocksync.json")]
        config: PathBuf,

        /// Username to create
        user_name: String,

        /// Language id stored with the user
        #[arg(long)]
        lang_id: Option<i64>,

        /// Password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
