//! Background execution of a submission
//!
//! The interface thread calls [`InstallWorker::submit`] and later
//! [`InstallWorker::poll`] from its timer; the blocking `sc` call happens on a
//! dedicated thread and its result is sent back over a channel.

use crate::error::{InstallerError, Result};
use crate::form::state::RegistrationForm;
use crate::service::{CommandOutput, CommandRunner};
use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error};

/// Runs at most one install at a time off the interface thread
pub struct InstallWorker {
    runner: Arc<dyn CommandRunner>,
    pending: Option<Receiver<Result<CommandOutput>>>,
}

impl InstallWorker {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            pending: None,
        }
    }

    /// Whether a submitted install has not reported yet
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Validate the form and start the install in the background
    ///
    /// Returns `true` when a worker thread was started. Rejections are already
    /// rendered on the form when this returns `false`.
    pub fn submit(&mut self, form: &mut RegistrationForm) -> bool {
        if self.is_busy() {
            form.refuse_busy();
            return false;
        }

        let Ok(command) = form.begin_install() else {
            return false;
        };

        let (result_tx, result_rx) = bounded(1);
        let runner = Arc::clone(&self.runner);

        let spawned = thread::Builder::new()
            .name("sc-install".to_string())
            .spawn(move || {
                let result = runner.run(&command);
                debug!("Install worker finished");
                let _ = result_tx.send(result);
            });

        match spawned {
            Ok(_) => {
                self.pending = Some(result_rx);
                true
            }
            Err(e) => {
                error!("Failed to start install worker: {}", e);
                form.finish_install(Err(InstallerError::spawn("install worker", e)));
                false
            }
        }
    }

    /// Apply a finished result to the form without blocking
    ///
    /// Returns `true` when a result was rendered.
    pub fn poll(&mut self, form: &mut RegistrationForm) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(InstallerError::WorkerLost),
        };

        self.pending = None;
        form.finish_install(result)
    }

    /// Block until the pending install reports
    pub fn wait(&mut self, form: &mut RegistrationForm) -> bool {
        let Some(rx) = self.pending.take() else {
            return false;
        };

        let result = rx.recv().unwrap_or(Err(InstallerError::WorkerLost));
        form.finish_install(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::message::Severity;
    use crate::form::state::{FormPhase, Progress};
    use crate::service::ScCreate;
    use crossbeam_channel::Sender;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Blocks each run until the test releases it
    struct GatedRunner {
        gate: Mutex<Receiver<i32>>,
        runs: AtomicUsize,
    }

    impl GatedRunner {
        fn new() -> (Arc<Self>, Sender<i32>) {
            let (tx, rx) = bounded(4);
            let runner = Arc::new(Self {
                gate: Mutex::new(rx),
                runs: AtomicUsize::new(0),
            });
            (runner, tx)
        }
    }

    impl CommandRunner for GatedRunner {
        fn run(&self, _command: &ScCreate) -> Result<CommandOutput> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let exit_code = self.gate.lock().unwrap().recv().unwrap_or(-1);
            Ok(CommandOutput {
                exit_code,
                stderr: String::new(),
            })
        }
    }

    struct PanickingRunner;

    impl CommandRunner for PanickingRunner {
        fn run(&self, _command: &ScCreate) -> Result<CommandOutput> {
            panic!("runner exploded");
        }
    }

    #[test]
    fn test_result_is_marshalled_back() {
        let (runner, release) = GatedRunner::new();
        let mut worker = InstallWorker::new(runner.clone());
        let mut form = RegistrationForm::with_fields("C:\\svc\\worker.exe", "worker");

        assert!(worker.submit(&mut form));
        assert!(worker.is_busy());
        assert_eq!(form.progress(), Progress::Running);
        assert!(!worker.poll(&mut form));

        release.send(0).unwrap();
        assert!(worker.wait(&mut form));

        assert!(!worker.is_busy());
        assert_eq!(form.phase(), FormPhase::Reported);
        assert_eq!(form.progress(), Progress::Stopped);
        assert_eq!(form.message().unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_only_one_install_in_flight() {
        let (runner, release) = GatedRunner::new();
        let mut worker = InstallWorker::new(runner.clone());
        let mut form = RegistrationForm::with_fields("C:\\svc\\worker.exe", "worker");

        assert!(worker.submit(&mut form));
        assert!(!worker.submit(&mut form));
        assert_eq!(form.message().unwrap().text, "An install is already in progress.");

        release.send(2).unwrap();
        assert!(worker.wait(&mut form));
        assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
        assert!(form.message().unwrap().text.contains("Error Code: 2"));

        // Form accepts a new submission once reported
        assert!(worker.submit(&mut form));
        release.send(0).unwrap();
        assert!(worker.wait(&mut form));
        assert_eq!(runner.runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_rejected_submission_spawns_nothing() {
        let (runner, _release) = GatedRunner::new();
        let mut worker = InstallWorker::new(runner.clone());
        let mut form = RegistrationForm::with_fields("", "worker");

        assert!(!worker.submit(&mut form));
        assert!(!worker.is_busy());
        assert_eq!(form.phase(), FormPhase::Rejected);
        assert_eq!(runner.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lost_worker_is_reported() {
        let mut worker = InstallWorker::new(Arc::new(PanickingRunner));
        let mut form = RegistrationForm::with_fields("C:\\svc\\worker.exe", "worker");

        assert!(worker.submit(&mut form));
        assert!(worker.wait(&mut form));

        let message = form.message().unwrap();
        assert!(message.is_error());
        assert!(message.text.contains("without reporting a result"));
        assert_eq!(form.progress(), Progress::Stopped);
    }

    #[test]
    fn test_busy_worker_refuses_other_form() {
        let (runner, release) = GatedRunner::new();
        let mut worker = InstallWorker::new(runner.clone());
        let mut first = RegistrationForm::with_fields("C:\\svc\\a.exe", "a");
        let mut second = RegistrationForm::with_fields("C:\\svc\\b.exe", "b");

        assert!(worker.submit(&mut first));
        assert!(!worker.submit(&mut second));

        assert_eq!(second.phase(), FormPhase::Idle);
        assert_eq!(second.progress(), Progress::Stopped);
        assert_eq!(second.message().unwrap().text, "An install is already in progress.");

        release.send(0).unwrap();
        assert!(worker.wait(&mut first));
        assert_eq!(runner.runs.load(Ordering::SeqCst), 1);

        // Refused form can submit normally afterwards
        assert!(worker.submit(&mut second));
        release.send(0).unwrap();
        assert!(worker.wait(&mut second));
        assert_eq!(second.progress(), Progress::Stopped);
        assert_eq!(second.message().unwrap().severity, Severity::Success);
    }
}
