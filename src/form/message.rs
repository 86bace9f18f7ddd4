//! Status area messages

use crate::service::{CommandOutput, ScCreate};
use std::fmt;

/// Shown in place of empty standard error on failure
pub const NO_DETAILS_PLACEHOLDER: &str = "No detailed error information available.";

/// How the status area colours a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Text rendered into the status area after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    /// Either field was blank
    pub fn validation() -> Self {
        Self::error("Error: Both fields are required!".to_string())
    }

    /// `sc` exited with zero
    pub fn installed(service_name: &str) -> Self {
        Self {
            severity: Severity::Success,
            text: format!("Service '{}' installed successfully!", service_name),
        }
    }

    /// `sc` exited with a non-zero code
    pub fn failed(command: &ScCreate, output: &CommandOutput) -> Self {
        let stderr = output.stderr.trim();
        let details = if stderr.is_empty() {
            NO_DETAILS_PLACEHOLDER
        } else {
            stderr
        };

        Self::error(format!(
            "Failed to install service.\nCommand: {}\nError Code: {}\nOutput: {}",
            command, output.exit_code, details
        ))
    }

    /// The invocation itself faulted
    pub fn unexpected(err: &dyn fmt::Display) -> Self {
        Self::error(format!("An unexpected error occurred:\n{}", err))
    }

    /// Another submission is still executing
    pub fn busy() -> Self {
        Self::error("An install is already in progress.".to_string())
    }

    fn error(text: String) -> Self {
        Self {
            severity: Severity::Error,
            text,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceRequest;

    fn command() -> ScCreate {
        ScCreate::new(ServiceRequest::new("C:\\svc\\worker.exe", "My Worker").unwrap())
    }

    #[test]
    fn test_failure_includes_command_code_and_stderr() {
        let output = CommandOutput {
            exit_code: 1073,
            stderr: "  [SC] CreateService FAILED 1073:\r\n\r\nThe specified service already exists.\r\n"
                .to_string(),
        };
        let message = StatusMessage::failed(&command(), &output);

        assert!(message.is_error());
        assert!(message
            .text
            .contains(r#"Command: sc create "My Worker" binPath= "C:\svc\worker.exe" start= auto"#));
        assert!(message.text.contains("Error Code: 1073"));
        assert!(message
            .text
            .ends_with("Output: [SC] CreateService FAILED 1073:\r\n\r\nThe specified service already exists."));
    }

    #[test]
    fn test_failure_uses_placeholder_for_blank_stderr() {
        let output = CommandOutput {
            exit_code: 5,
            stderr: " \r\n".to_string(),
        };
        let message = StatusMessage::failed(&command(), &output);
        assert!(message.text.contains("Error Code: 5"));
        assert!(message.text.ends_with(NO_DETAILS_PLACEHOLDER));
    }

    #[test]
    fn test_success_names_service() {
        let message = StatusMessage::installed("My Worker");
        assert_eq!(message.severity, Severity::Success);
        assert_eq!(message.to_string(), "Service 'My Worker' installed successfully!");
    }
}
