//! Optional installer settings file

use crate::error::{InstallerError, Result};
use crate::service::SC_PROGRAM;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "worker-service-installer.toml";

/// Directory name under the user config dir
const CONFIG_DIR_NAME: &str = "worker-service-installer";

/// Installer settings loaded from TOML
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Service control program (path or name on PATH)
    pub sc_program: String,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log file path (empty = no file logging)
    pub log_file: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            sc_program: SC_PROGRAM.to_string(),
            log_level: "info".to_string(),
            log_file: String::new(),
        }
    }
}

impl InstallerConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| InstallerError::config(path.as_ref(), e))?;

        Self::parse(&content).map_err(|e| InstallerError::config(path.as_ref(), e))
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. Same directory as executable: worker-service-installer.toml
    /// 2. <config dir>\worker-service-installer\config.toml
    pub fn load_default() -> Result<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                debug!("Loading config from {:?}", path);
                return Self::load(&path);
            }
        }

        Ok(Self::default())
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
        {
            paths.push(exe_dir.join(CONFIG_FILE_NAME));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(CONFIG_DIR_NAME).join("config.toml"));
        }

        paths
    }

    /// Log file as a path, if one is configured
    pub fn log_file(&self) -> Option<&Path> {
        if self.log_file.is_empty() {
            None
        } else {
            Some(Path::new(&self.log_file))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = InstallerConfig::parse("").unwrap();
        assert_eq!(config, InstallerConfig::default());
        assert_eq!(config.sc_program, "sc.exe");
        assert!(config.log_file().is_none());
    }

    #[test]
    fn test_partial_file() {
        let config = InstallerConfig::parse(
            r#"
sc_program = 'C:\Windows\System32\sc.exe'
log_file = 'C:\ProgramData\wsinstaller.log'
"#,
        )
        .unwrap();

        assert_eq!(config.sc_program, r"C:\Windows\System32\sc.exe");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_file(), Some(Path::new(r"C:\ProgramData\wsinstaller.log")));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "wsinstaller-bad-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "log_level = [").unwrap();

        let err = InstallerConfig::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);

        match err {
            InstallerError::Config { path: reported, .. } => {
                assert_eq!(reported, path.to_string_lossy());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let path = std::env::temp_dir().join("wsinstaller-no-such-config.toml");
        assert!(InstallerConfig::load(path).is_err());
    }
}
