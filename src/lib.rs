//! Worker-Service Installer
//!
//! Desktop form that registers a published worker binary as an
//! auto-starting Windows service through `sc create`.

pub mod config;
pub mod error;
pub mod form;
pub mod service;

#[cfg(windows)]
pub mod ui;

pub use error::{InstallerError, Result, ValidationError};
