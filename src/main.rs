//! Worker-Service Installer
//!
//! Opens the installer window, or registers a service headless with
//! `wsinstaller install --path <exe> --name <service>`.
//!
//! Run with `--debug` to show a console window and log to it.

#![cfg_attr(windows, windows_subsystem = "windows")]

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use worker_service_installer::config::{Args, Command, InstallerConfig};
use worker_service_installer::form::RegistrationForm;
use worker_service_installer::service::{CommandRunner, ScRunner};

fn main() -> Result<()> {
    // GUI subsystem: without this, --help and headless output go nowhere
    #[cfg(windows)]
    let has_console = worker_service_installer::ui::attach_console(
        std::env::args().any(|arg| arg == "--debug" || arg == "-d"),
    );

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => InstallerConfig::load(path),
        None => InstallerConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    #[cfg(windows)]
    let log_to_console = has_console && args.wants_console();
    #[cfg(not(windows))]
    let log_to_console = args.wants_console();

    init_logging(&args, &config, log_to_console)?;

    let runner: Arc<dyn CommandRunner> = Arc::new(ScRunner::new(&config.sc_program));

    match args.command {
        Some(Command::Install { path, name }) => cmd_install(&path, &name, runner.as_ref()),
        None => cmd_window(
            args.path.unwrap_or_default(),
            args.name.unwrap_or_default(),
            runner,
        ),
    }
}

fn init_logging(args: &Args, config: &InstallerConfig, log_to_console: bool) -> Result<()> {
    let level = args
        .log_level()
        .map(|level| level.to_string())
        .unwrap_or_else(|| config.log_level.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if let Some(log_file) = args.log.as_deref().or_else(|| config.log_file()) {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("Failed to open log file {:?}", log_file))?;
        subscriber.with_writer(file).with_ansi(false).init();
    } else if log_to_console {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

/// Register the service without the window
fn cmd_install(path: &str, name: &str, runner: &dyn CommandRunner) -> Result<()> {
    let message = RegistrationForm::with_fields(path, name).install_headless(runner)?;
    println!("{}", message);
    Ok(())
}

/// Open the installer window
#[cfg(windows)]
fn cmd_window(path: String, name: String, runner: Arc<dyn CommandRunner>) -> Result<()> {
    info!("Starting installer window");
    let form = RegistrationForm::with_fields(path, name);
    worker_service_installer::ui::run(form, runner).context("Installer window failed")?;
    Ok(())
}

#[cfg(not(windows))]
fn cmd_window(_path: String, _name: String, _runner: Arc<dyn CommandRunner>) -> Result<()> {
    info!("Installer window requested on a non-Windows host");
    anyhow::bail!("The installer window requires Windows; use `wsinstaller install --path <exe> --name <service>`")
}
