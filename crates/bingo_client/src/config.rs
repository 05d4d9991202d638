//! Configuration management for the bingo client.
//!
//! This module handles loading, validation, and override of client
//! configuration from TOML files and command-line arguments.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Default reconnect delay for serde deserialization
fn default_reconnect_delay() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application configuration loaded from TOML file.
///
/// This is the main configuration structure that encompasses all client
/// settings including the server connection and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server connection settings
    pub server: ServerSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// WebSocket URL of the multiworld server (ws:// or wss://)
    pub url: String,
    /// Slot (player) name to connect as
    pub slot_name: String,
    /// Room password, if the server requires one
    #[serde(default)]
    pub password: Option<String>,
    /// Seconds to wait before reconnecting after a dropped connection
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
}

/// Logging system configuration.
///
/// Controls log output format and level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                url: "ws://localhost:38281".to_string(),
                slot_name: "Player1".to_string(),
                password: None,
                reconnect_delay_secs: default_reconnect_delay(),
            },
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file does not exist, a default configuration file is written
    /// to the path so the user has a template to edit.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            let config = Self::default();
            let toml_content = toml::to_string_pretty(&config)?;
            tokio::fs::write(path, toml_content).await?;
            info!(
                "Created default configuration at {} - edit it and restart",
                path.display()
            );
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validates the merged configuration.
    ///
    /// # Returns
    ///
    /// `Ok(())` if all settings are usable, or a description of the first
    /// problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !self.server.url.starts_with("ws://") && !self.server.url.starts_with("wss://") {
            return Err(format!(
                "server.url must start with ws:// or wss://, got '{}'",
                self.server.url
            ));
        }

        if self.server.slot_name.trim().is_empty() {
            return Err("server.slot_name must not be empty".to_string());
        }

        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "logging.level must be one of {LEVELS:?}, got '{}'",
                self.logging.level
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_websocket_url() {
        let mut config = AppConfig::default();
        config.server.url = "http://localhost:38281".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_slot_name() {
        let mut config = AppConfig::default();
        config.server.slot_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn load_creates_default_file_when_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let config = AppConfig::load_from_file(&path).await.expect("load");
        assert!(path.exists());
        assert_eq!(config.server.url, "ws://localhost:38281");

        // A second load reads the file back identically.
        let reloaded = AppConfig::load_from_file(&path).await.expect("reload");
        assert_eq!(reloaded.server.slot_name, config.server.slot_name);
    }

    #[tokio::test]
    async fn load_parses_partial_file_with_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            "[server]\nurl = \"wss://archipelago.gg:12345\"\nslot_name = \"Bingo\"\n",
        )
        .await
        .expect("write");

        let config = AppConfig::load_from_file(&path).await.expect("load");
        assert_eq!(config.server.url, "wss://archipelago.gg:12345");
        assert_eq!(config.server.reconnect_delay_secs, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }
}
