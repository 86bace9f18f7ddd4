//! Command line and settings file

mod args;
mod settings;

pub use args::{Args, Command};
pub use settings::{InstallerConfig, CONFIG_FILE_NAME};
