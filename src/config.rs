use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub input: InputConfig,
}

/// Editor behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Extra Ctrl-Q presses needed to quit with unsaved changes
    #[serde(default = "default_quit_times")]
    pub quit_times: usize,

    #[serde(default = "default_message_timeout")]
    pub message_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub show_help_message: bool,
}

fn default_quit_times() -> usize {
    3
}

fn default_message_timeout() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quit_times: default_quit_times(),
            message_timeout_secs: default_message_timeout(),
            show_help_message: true,
        }
    }
}

impl EditorConfig {
    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }
}

/// Terminal input timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    /// How long one loop iteration waits for a key
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_ms: u64,

    /// How long to wait for each byte of an escape sequence
    #[serde(default = "default_escape_timeout")]
    pub escape_timeout_ms: u64,
}

fn default_poll_timeout() -> u64 {
    100
}

fn default_escape_timeout() -> u64 {
    100
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_timeout_ms: default_poll_timeout(),
            escape_timeout_ms: default_escape_timeout(),
        }
    }
}

impl InputConfig {
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }

    pub fn escape_timeout(&self) -> Duration {
        Duration::from_millis(self.escape_timeout_ms)
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Default config file location: `easypoetry/config.json` under the
    /// platform config directory (`$XDG_CONFIG_HOME` or `~/.config` on Linux).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("easypoetry").join("config.json"))
    }

    /// Load the config from [`Config::default_path`] if the file exists.
    ///
    /// A missing file is not an error; defaults are returned.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.message_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "message_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.input.escape_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "escape_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
