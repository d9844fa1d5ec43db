//! Application configuration
//!
//! Loaded from `config.yaml` in the platform config directory, with
//! environment overrides. Loading never fails; missing or malformed files
//! fall back to defaults so the CLI stays usable on a fresh machine.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable overriding the database location
pub const DB_ENV: &str = "DOCUHUB_DB";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite database file
    pub database: Option<PathBuf>,

    /// Organisation name used in notification emails
    pub company_name: String,

    /// Sender identity for outgoing notifications
    pub sender_name: String,
    pub sender_email: String,

    /// Base URL used when rendering project links in notifications
    pub frontend_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            company_name: "DocuHub".to_string(),
            sender_name: "DocuHub System".to_string(),
            sender_email: "noreply@docuhub.local".to_string(),
            frontend_url: "http://localhost:8000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration, falling back to defaults on any problem
    pub fn load() -> Self {
        let Some(path) = Self::config_file() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => serde_yml::from_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "ignoring malformed config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Resolve the database path: explicit flag, then environment, then
    /// config file, then the platform data directory.
    pub fn database_path(&self, flag: Option<PathBuf>) -> PathBuf {
        if let Some(path) = flag {
            return path;
        }
        if let Ok(path) = std::env::var(DB_ENV) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        if let Some(path) = &self.database {
            return path.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().join("docuhub.sqlite3"))
            .unwrap_or_else(|| PathBuf::from("docuhub.sqlite3"))
    }

    fn config_file() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "docuhub", "docuhub")
    }
}
