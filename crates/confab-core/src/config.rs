//! Configuration system for confab.
//!
//! Resolution order: environment variables → config file → defaults.
//! CLI flags on the binaries override all three.
//!
//! Config file location:
//!   1. $CONFAB_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/confab/config.toml
//!   3. ~/.config/confab/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, shared by the tracker and peer daemons.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfabConfig {
    pub tracker: TrackerConfig,
    pub peer: PeerConfig,
}

/// Where the tracker listens, and where peers reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerConfig {
    /// Display name sent with registrations and handshakes.
    pub username: String,
    /// Local API port. The P2P listener binds `port + 1000`.
    pub port: u16,
    /// Address advertised to the tracker for inbound P2P traffic.
    pub advertised_ip: String,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            username: "Anonymous".to_string(),
            port: 5000,
            advertised_ip: "127.0.0.1".to_string(),
        }
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join("confab")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl ConfabConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            ConfabConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("CONFAB_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&ConfabConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply CONFAB_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("CONFAB_TRACKER__HOST") {
            self.tracker.host = v;
        }
        if let Ok(v) = std::env::var("CONFAB_TRACKER__PORT") {
            if let Ok(p) = v.parse() {
                self.tracker.port = p;
            }
        }
        if let Ok(v) = std::env::var("CONFAB_PEER__USERNAME") {
            self.peer.username = v;
        }
        if let Ok(v) = std::env::var("CONFAB_PEER__PORT") {
            if let Ok(p) = v.parse() {
                self.peer.port = p;
            }
        }
        if let Ok(v) = std::env::var("CONFAB_PEER__ADVERTISED_IP") {
            self.peer.advertised_ip = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_tracker() {
        let config = ConfabConfig::default();
        assert_eq!(config.tracker.host, "127.0.0.1");
        assert_eq!(config.tracker.port, 8000);
        assert_eq!(config.peer.username, "Anonymous");
        assert_eq!(config.peer.port, 5000);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: ConfabConfig = toml::from_str(
            r#"
            [peer]
            username = "alice"
            "#,
        )
        .unwrap();
        assert_eq!(config.peer.username, "alice");
        assert_eq!(config.peer.port, 5000);
        assert_eq!(config.tracker.port, 8000);
    }

    #[test]
    fn write_default_if_missing_creates_file() {
        let tmp = std::env::temp_dir().join(format!("confab-config-test-{}", std::process::id()));
        let config_path = tmp.join("config.toml");
        std::fs::create_dir_all(&tmp).unwrap();

        unsafe {
            std::env::set_var("CONFAB_CONFIG", config_path.to_str().unwrap());
        }

        let path = ConfabConfig::write_default_if_missing().expect("write_default_if_missing");
        assert!(path.exists());

        let config = ConfabConfig::load().expect("load should succeed");
        assert_eq!(config.tracker.port, 8000);

        unsafe {
            std::env::remove_var("CONFAB_CONFIG");
        }
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
