//! Execution of the service control program

use crate::error::{InstallerError, Result};
use crate::service::command::ScCreate;
use std::path::PathBuf;
use std::process::Command;
use tracing::{debug, error};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Exit code reported when the process ended without one (killed by a signal)
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// Captured result of a completed process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an `sc create` command to completion
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &ScCreate) -> Result<CommandOutput>;
}

/// Runner backed by `std::process` and the real `sc` program
#[derive(Debug, Clone)]
pub struct ScRunner {
    program: PathBuf,
}

impl ScRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn build(&self, command: &ScCreate) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(command.args());

        // GUI process: keep sc.exe from flashing a console
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

impl CommandRunner for ScRunner {
    fn run(&self, command: &ScCreate) -> Result<CommandOutput> {
        debug!(program = ?self.program, args = ?command.args(), "Spawning service control");

        let output = self.build(command).output().map_err(|e| {
            error!("Failed to launch {:?}: {}", self.program, e);
            InstallerError::spawn(self.program.to_string_lossy(), e)
        })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(UNKNOWN_EXIT_CODE),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::command::ServiceRequest;

    fn sample_command() -> ScCreate {
        ScCreate::new(ServiceRequest::new("C:\\svc\\worker.exe", "worker").unwrap())
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let runner = ScRunner::new("definitely-not-a-real-sc-program-4f1d");
        let err = runner.run(&sample_command()).unwrap_err();

        match err {
            InstallerError::Spawn { program, source } => {
                assert_eq!(program, "definitely-not-a-real-sc-program-4f1d");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_captured() {
        let runner = ScRunner::new("false");
        let output = runner.run(&sample_command()).unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, 1);
        assert!(output.stderr.is_empty());
    }
}
