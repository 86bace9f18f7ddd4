//! CLI argument parsing using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Worker-Service Installer
///
/// Register a published worker binary as an auto-start Windows service.
/// Without a subcommand the installer window is opened.
#[derive(Parser, Debug)]
#[command(name = "wsinstaller")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Prefill the published path field
    #[arg(long)]
    pub path: Option<String>,

    /// Prefill the service name field
    #[arg(long)]
    pub name: Option<String>,

    /// Show a console window and log to it
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Verbose output (can be repeated for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode - only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output to file
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    /// Read settings from this TOML file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Register the service without opening the window
    Install {
        /// Executable path registered as the service binPath
        #[arg(long)]
        path: String,

        /// Service name
        #[arg(long)]
        name: String,
    },
}

impl Args {
    /// Log level from verbose/quiet flags, `None` when neither was given
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.quiet {
            Some(tracing::Level::ERROR)
        } else {
            match self.verbose {
                0 => None,
                1 => Some(tracing::Level::DEBUG),
                _ => Some(tracing::Level::TRACE),
            }
        }
    }

    /// Whether log output should go to a console
    pub fn wants_console(&self) -> bool {
        self.debug || self.command.is_some()
    }
}
