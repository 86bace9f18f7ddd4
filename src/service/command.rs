//! Service registration request and `sc create` command synthesis

use crate::error::ValidationError;
use std::ffi::OsString;
use std::fmt;

/// Start mode passed to `start=`
pub const START_MODE_AUTO: &str = "auto";

/// Validated form input for one registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    /// Executable path registered as `binPath`
    pub path: String,
    /// Name in the service registry
    pub name: String,
}

impl ServiceRequest {
    /// Trim both fields and reject the pair if either is empty
    pub fn new(path: &str, name: &str) -> Result<Self, ValidationError> {
        let path = path.trim();
        let name = name.trim();

        if path.is_empty() {
            return Err(ValidationError::EmptyPath);
        }
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        Ok(Self {
            path: path.to_string(),
            name: name.to_string(),
        })
    }
}

/// An `sc create` invocation for one service
///
/// The command is run as a plain argument vector, so quotes or shell
/// metacharacters inside the name or path never reach a command interpreter.
/// [`fmt::Display`] renders the familiar quoted form for the status area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScCreate {
    request: ServiceRequest,
}

impl ScCreate {
    pub fn new(request: ServiceRequest) -> Self {
        Self { request }
    }

    pub fn service_name(&self) -> &str {
        &self.request.name
    }

    pub fn binary_path(&self) -> &str {
        &self.request.path
    }

    /// Arguments following the `sc` program name
    ///
    /// `sc` expects `option=` and its value as separate tokens.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "create".into(),
            self.request.name.clone().into(),
            "binPath=".into(),
            self.request.path.clone().into(),
            "start=".into(),
            START_MODE_AUTO.into(),
        ]
    }
}

impl fmt::Display for ScCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sc create \"{}\" binPath= \"{}\" start= {}",
            self.request.name, self.request.path, START_MODE_AUTO
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_fields() {
        let request = ServiceRequest::new("  C:\\svc\\worker.exe \t", "\nMy Worker ").unwrap();
        assert_eq!(request.path, "C:\\svc\\worker.exe");
        assert_eq!(request.name, "My Worker");
    }

    #[test]
    fn test_request_rejects_blank_fields() {
        assert_eq!(
            ServiceRequest::new("", "worker"),
            Err(ValidationError::EmptyPath)
        );
        assert_eq!(
            ServiceRequest::new("C:\\svc", "   "),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            ServiceRequest::new(" \t ", " "),
            Err(ValidationError::EmptyPath)
        );
    }

    #[test]
    fn test_display_matches_sc_syntax() {
        let request = ServiceRequest::new("C:\\svc\\worker.exe", "My Worker").unwrap();
        let command = ScCreate::new(request);
        assert_eq!(
            command.to_string(),
            r#"sc create "My Worker" binPath= "C:\svc\worker.exe" start= auto"#
        );
    }

    #[test]
    fn test_args_keep_values_verbatim() {
        let request = ServiceRequest::new(r#"C:\a "b"\c.exe"#, "x\" & del *").unwrap();
        let command = ScCreate::new(request);
        let args: Vec<String> = command
            .args()
            .into_iter()
            .map(|a| a.into_string().unwrap())
            .collect();

        assert_eq!(
            args,
            [
                "create",
                "x\" & del *",
                "binPath=",
                r#"C:\a "b"\c.exe"#,
                "start=",
                "auto"
            ]
        );
    }
}
