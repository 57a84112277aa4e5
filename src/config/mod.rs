//! Configuration management for mailvane.
//!
//! Configuration is read from `~/.config/mailvane/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::poller::DEFAULT_MIN_INTERVAL_SECS;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub output: OutputConfig,
    pub watch: Vec<WatchConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            output: OutputConfig::default(),
            watch: Vec::new(),
        }
    }
}

/// Feed endpoint and polling settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// URL of the unread-mail feed.
    pub url: String,
    /// Minimum seconds between two polls.
    pub poll_interval_secs: u64,
    /// Value sent verbatim as the `Cookie` header, when the feed needs a
    /// session.
    pub cookie: Option<String>,
    /// HTTP basic auth user.
    pub username: Option<String>,
    /// HTTP basic auth password. Stored in plain text.
    pub password: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            poll_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
            cookie: None,
            username: None,
            password: None,
        }
    }
}

/// Where the durable file sink writes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root path: the sink writes `<root>-nbmails.txt` and
    /// `<root>-headers.txt`. Nothing is written when unset.
    pub root: Option<PathBuf>,
}

/// One watch rule: a sender-name pattern and an optional shell command.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Regular expression searched against each sender name.
    pub pattern: String,
    /// Shell command spawned detached on every match.
    pub command: Option<String>,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            // Create default config with comments
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/mailvane/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("mailvane").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Mailvane Configuration
#
# mailvane polls an authenticated webmail feed for unread messages and
# fans a formatted summary out to the configured outputs.

[feed]
# URL of the unread-mail feed
url = ""

# Minimum seconds between two polls
poll_interval_secs = 180

# Session cookie sent verbatim as the Cookie header, if the feed
# requires one, e.g. "SID=abc123"
# cookie = ""

# HTTP basic auth credentials. Stored in plain text; keep this file
# readable only by you.
# username = ""
# password = ""

[output]
# Root path for the durable files: <root>-nbmails.txt receives the
# unread count, <root>-headers.txt the formatted header table.
# root = "/tmp/mailvane"

# Watch rules: each pattern is a regular expression searched against
# every sender name. Matching senders are collected into the highlight
# text; an optional command is spawned (via sh -c) on every match.
# [[watch]]
# pattern = "Boss"
# command = "aplay ~/important.wav"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        // Check a few values
        assert!(config.feed.url.is_empty());
        assert_eq!(config.feed.poll_interval_secs, 180);
        assert!(config.output.root.is_none());
        assert!(config.watch.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[feed]
url = "https://mail.example.com/feed/atom"
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        // Custom value
        assert_eq!(config.feed.url, "https://mail.example.com/feed/atom");
        // Default value
        assert_eq!(config.feed.poll_interval_secs, 180);
    }

    #[test]
    fn test_empty_config() {
        let content = "";
        let config: Config = toml::from_str(content).expect("Empty config should work");

        // All defaults
        assert!(config.feed.url.is_empty());
        assert!(config.watch.is_empty());
    }

    #[test]
    fn test_watch_rules_parse_in_order() {
        let content = r#"
[feed]
url = "https://mail.example.com/feed/atom"

[[watch]]
pattern = "Boss"
command = "notify-send boss-mail"

[[watch]]
pattern = "^Alice "
"#;
        let config: Config = toml::from_str(content).expect("Watch config should parse");

        assert_eq!(config.watch.len(), 2);
        assert_eq!(config.watch[0].pattern, "Boss");
        assert_eq!(
            config.watch[0].command.as_deref(),
            Some("notify-send boss-mail")
        );
        assert_eq!(config.watch[1].pattern, "^Alice ");
        assert!(config.watch[1].command.is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
