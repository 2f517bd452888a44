//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for keynote
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the events API
    pub events_url: Option<String>,
    /// Base URL of the streaming assistant API
    pub agent_url: Option<String>,
    /// Request timeout in seconds; unset applies no timeout, since the
    /// server may hold the connection for the whole generation
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keynote")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for KEYNOTE_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("KEYNOTE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap();
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            events_url: Some("http://localhost:8000".to_string()),
            agent_url: Some("http://localhost:8000".to_string()),
            timeout_secs: None,
        };

        default_config.save()?;
        Ok(path)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# keynote configuration file
# Place at ~/.config/keynote/config.toml (Linux/Mac) or %APPDATA%\keynote\config.toml (Windows)

# Base URL of the events API
events_url = "http://localhost:8000"

# Base URL of the streaming assistant API
agent_url = "http://localhost:8000"

# Request timeout in seconds (omit for no timeout; answers may stream for
# a long time)
# timeout_secs = 120
"#
}
