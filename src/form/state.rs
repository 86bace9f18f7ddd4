//! The registration form model
//!
//! `RegistrationForm` owns the two input fields, the progress indicator state
//! and the status message. The window only mirrors it; every handler goes
//! through these methods.

use crate::error::{InstallerError, Result};
use crate::form::message::StatusMessage;
use crate::service::{CommandOutput, CommandRunner, ScCreate, ServiceRequest};
use std::path::PathBuf;
use tracing::{info, warn};

/// Source of a directory picked by the operator
pub trait DirectoryChooser {
    /// `None` when the operator cancels
    fn choose_directory(&self) -> Option<PathBuf>;
}

/// A choice already made, e.g. by a modal dialog that ran before the form was borrowed
impl DirectoryChooser for Option<PathBuf> {
    fn choose_directory(&self) -> Option<PathBuf> {
        self.clone()
    }
}

/// Submission lifecycle
///
/// Validation happens synchronously inside [`RegistrationForm::begin_install`],
/// so it never shows up as a resting phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Rejected,
    Executing,
    Reported,
}

/// Indeterminate progress indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Progress {
    #[default]
    Stopped,
    Running,
}

/// Service registration form state
#[derive(Debug, Default)]
pub struct RegistrationForm {
    path: String,
    name: String,
    phase: FormPhase,
    progress: Progress,
    message: Option<StatusMessage>,
    in_flight: Option<ScCreate>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a form with prefilled fields
    pub fn with_fields(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn is_executing(&self) -> bool {
        self.phase == FormPhase::Executing
    }

    /// Replace the path field with a directory from the chooser
    ///
    /// Returns `false` and leaves the field untouched on cancel.
    pub fn select_folder(&mut self, chooser: &dyn DirectoryChooser) -> bool {
        match chooser.choose_directory() {
            Some(dir) => {
                self.path = dir.to_string_lossy().into_owned();
                info!("Selected folder: {}", self.path);
                true
            }
            None => false,
        }
    }

    /// Render the refusal of a submission while another install runs
    ///
    /// Phase, progress and any in-flight command are left untouched.
    pub(crate) fn refuse_busy(&mut self) {
        warn!("Install requested while another is executing");
        self.message = Some(StatusMessage::busy());
    }

    /// Validate the fields and move to `Executing`
    ///
    /// On success the progress indicator is running and the returned command
    /// must be handed back through [`finish_install`](Self::finish_install).
    pub fn begin_install(&mut self) -> Result<ScCreate> {
        if self.is_executing() {
            self.refuse_busy();
            return Err(InstallerError::AlreadyRunning);
        }

        self.message = None;

        let request = match ServiceRequest::new(&self.path, &self.name) {
            Ok(request) => request,
            Err(e) => {
                info!("Install rejected: {}", e);
                self.phase = FormPhase::Rejected;
                self.message = Some(StatusMessage::validation());
                return Err(e.into());
            }
        };

        let command = ScCreate::new(request);
        info!("Installing service: {}", command);

        self.progress = Progress::Running;
        self.phase = FormPhase::Executing;
        self.in_flight = Some(command.clone());
        Ok(command)
    }

    /// Stop the progress indicator and render the outcome
    ///
    /// Returns `false` if no install was executing.
    pub fn finish_install(&mut self, result: Result<CommandOutput>) -> bool {
        let Some(command) = self.in_flight.take() else {
            warn!("Install result arrived with nothing in flight");
            return false;
        };

        self.progress = Progress::Stopped;
        self.phase = FormPhase::Reported;

        let message = match result {
            Ok(output) if output.success() => {
                info!("Service '{}' installed", command.service_name());
                StatusMessage::installed(command.service_name())
            }
            Ok(output) => {
                warn!(
                    "sc exited with code {} for service '{}'",
                    output.exit_code,
                    command.service_name()
                );
                StatusMessage::failed(&command, &output)
            }
            Err(e) => StatusMessage::unexpected(&e),
        };

        self.message = Some(message);
        true
    }

    /// Run one submission to completion on the calling thread
    pub fn install_service(&mut self, runner: &dyn CommandRunner) -> Option<&StatusMessage> {
        if let Ok(command) = self.begin_install() {
            let result = runner.run(&command);
            self.finish_install(result);
        }
        self.message()
    }

    /// Run one submission and map the outcome to a result
    ///
    /// Success yields the rendered message; rejection, a non-zero exit and
    /// invocation faults all yield [`InstallerError::Reported`].
    pub fn install_headless(&mut self, runner: &dyn CommandRunner) -> Result<StatusMessage> {
        match self.install_service(runner) {
            Some(message) if !message.is_error() => Ok(message.clone()),
            Some(message) => Err(InstallerError::Reported(message.clone())),
            None => Err(InstallerError::WorkerLost),
        }
    }
}
