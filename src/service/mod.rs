//! Windows service registration
//!
//! Builds the `sc create` invocation for a published worker binary and runs
//! it through the Service Control Manager's command-line front end.

mod command;
mod runner;

pub use command::{ScCreate, ServiceRequest, START_MODE_AUTO};
pub use runner::{CommandOutput, CommandRunner, ScRunner, UNKNOWN_EXIT_CODE};

/// Service control program used when no override is configured
pub const SC_PROGRAM: &str = "sc.exe";
