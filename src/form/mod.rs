//! Service registration form
//!
//! Platform-neutral model of the installer window: field state, validation,
//! the submission lifecycle and status rendering.

mod message;
mod state;
mod worker;

pub use message::{Severity, StatusMessage, NO_DETAILS_PLACEHOLDER};
pub use state::{DirectoryChooser, FormPhase, Progress, RegistrationForm};
pub use worker::InstallWorker;
