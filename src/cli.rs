use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logger::LogFormat;

#[derive(Parser)]
#[command(name = "rusttde")]
#[command(about = "A Rust CLI tool for tape drive data encryption keys")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Specify configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log output format (overrides the configuration file)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install an encryption key and enable encryption
    SetKey {
        /// Tape device path (e.g. /dev/nst0 or /dev/sg1)
        #[arg(value_name = "DEVICE")]
        device: String,

        /// Raw key material; at most 32 bytes are used
        #[arg(short, long)]
        key: String,
    },

    /// Disable encryption and clear the drive's key
    ClearKey {
        /// Tape device path
        #[arg(value_name = "DEVICE")]
        device: String,
    },

    /// Show the drive's data encryption status
    Status {
        /// Tape device path
        #[arg(value_name = "DEVICE")]
        device: String,

        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether the drive reports end of data
    CheckEod {
        /// Tape device path
        #[arg(value_name = "DEVICE")]
        device: String,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
