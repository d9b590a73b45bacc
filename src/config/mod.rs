//
//  gocd-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads and saves the CLI's connection settings from a TOML file stored in
//! the platform-specific configuration directory, and resolves them
//! against command-line flags and environment variables.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/gocd/config.toml`
//! - **macOS**: `~/Library/Application Support/gocd/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\gocd\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! server = "https://ci.example.com"
//! username = "admin"
//! timeout_secs = 30
//! ```
//!
//! ## Resolution Order
//!
//! For every setting: command-line flag, then environment variable
//! (`GOCD_SERVER`, `GOCD_USERNAME`, `GOCD_PASSWORD`), then the file.
//! Flags and environment are merged by clap before they reach
//! [`Config::resolve`].
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`server`]: Server address normalization

mod file;
mod server;

pub use file::*;
pub use server::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::http_builder;
use crate::api::GoCdClient;
use crate::auth::Credentials;

/// Keys understood by [`Config::get`] and [`Config::set`].
pub const KEYS: [&str; 4] = ["server", "username", "password", "timeout_secs"];

/// Persistent connection settings.
///
/// # Examples
///
/// ```rust
/// use gocd_cli::config::Config;
///
/// let mut config = Config::default();
/// assert!(config.set("server", "ci.example.com").unwrap());
/// assert_eq!(config.get("server"), Some("https://ci.example.com".to_string()));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the GoCD server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Login name for basic authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password or access token for basic authentication.
    ///
    /// Prefer `GOCD_PASSWORD` over storing this in the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout in seconds; no timeout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Settings coming from flags or environment, which take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub server: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Fully resolved settings needed to talk to a server.
#[derive(Debug, Clone)]
pub struct Connection {
    pub server: String,
    pub credentials: Credentials,
    pub timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from the default location.
    ///
    /// A missing file is not an error; defaults are returned.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, returning defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the path to the configuration file.
    ///
    /// The file may not exist; this only returns where it would be.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Gets a value by key. Unknown and unset keys return `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "server" => self.server.clone(),
            "username" => self.username.clone(),
            "password" => self.password.clone(),
            "timeout_secs" => self.timeout_secs.map(|t| t.to_string()),
            _ => None,
        }
    }

    /// Sets a value by key.
    ///
    /// Returns `Ok(false)` for unknown keys. `server` is normalized with
    /// [`normalize_server`]; `timeout_secs` must be a whole number.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "server" => self.server = Some(normalize_server(value)),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "timeout_secs" => {
                let secs = value
                    .trim()
                    .parse()
                    .with_context(|| format!("timeout_secs must be a number, got '{}'", value))?;
                self.timeout_secs = Some(secs);
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Removes a value by key. Returns whether the key is known.
    pub fn unset(&mut self, key: &str) -> bool {
        match key {
            "server" => self.server = None,
            "username" => self.username = None,
            "password" => self.password = None,
            "timeout_secs" => self.timeout_secs = None,
            _ => return false,
        }
        true
    }

    /// Merges `overrides` over the file settings.
    ///
    /// # Errors
    ///
    /// Fails when no server or username is configured anywhere. A missing
    /// password resolves to an empty one.
    pub fn resolve(&self, overrides: &Overrides) -> Result<Connection> {
        let Some(server) = overrides.server.clone().or_else(|| self.server.clone()) else {
            bail!("No GoCD server configured. Pass --server, set GOCD_SERVER, or run 'gocd config set server <url>'");
        };
        let Some(username) = overrides.username.clone().or_else(|| self.username.clone()) else {
            bail!("No username configured. Pass --username, set GOCD_USERNAME, or run 'gocd config set username <name>'");
        };
        let password = overrides
            .password
            .clone()
            .or_else(|| self.password.clone())
            .unwrap_or_default();

        Ok(Connection {
            server: normalize_server(&server),
            credentials: Credentials::new(username, password),
            timeout: self.timeout_secs.map(Duration::from_secs),
        })
    }
}

impl Connection {
    /// Builds an API client for this connection.
    pub fn client(&self) -> Result<GoCdClient> {
        let mut builder = http_builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        GoCdClient::with_http_client(&self.server, self.credentials.clone(), http)
            .with_context(|| format!("Cannot use server '{}'", self.server))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("server", "ci.example.com").unwrap();
        config.set("username", "admin").unwrap();
        config.set("timeout_secs", "30").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timeout_secs, Some(30));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_set_unknown_key() {
        let mut config = Config::default();
        assert!(!config.set("editor", "vim").unwrap());
        assert!(!config.unset("editor"));
    }

    #[test]
    fn test_set_bad_timeout() {
        let mut config = Config::default();
        assert!(config.set("timeout_secs", "soon").is_err());
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config = Config {
            server: Some("https://file.example.com".to_string()),
            username: Some("file-user".to_string()),
            password: Some("file-pass".to_string()),
            timeout_secs: Some(5),
        };
        let overrides = Overrides {
            server: Some("flag.example.com".to_string()),
            username: None,
            password: Some("flag-pass".to_string()),
        };

        let connection = config.resolve(&overrides).unwrap();
        assert_eq!(connection.server, "https://flag.example.com");
        assert_eq!(connection.credentials, Credentials::new("file-user", "flag-pass"));
        assert_eq!(connection.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_resolve_requires_server_and_username() {
        let err = Config::default()
            .resolve(&Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("No GoCD server configured"));

        let config = Config {
            server: Some("https://ci.example.com".to_string()),
            ..Default::default()
        };
        let err = config.resolve(&Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("No username configured"));
    }

    #[test]
    fn test_connection_builds_client() {
        let config = Config {
            server: Some("http://localhost:8153".to_string()),
            username: Some("admin".to_string()),
            ..Default::default()
        };
        let client = config
            .resolve(&Overrides::default())
            .unwrap()
            .client()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8153/");
        assert_eq!(client.credentials().username(), "admin");
    }
}
