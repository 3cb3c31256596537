//! Configuration file handling.
//!
//! This module provides loading and saving of iocscan configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/iocscan/config.toml`
//! - macOS: `~/Library/Application Support/iocscan/config.toml`
//! - Windows: `%APPDATA%\iocscan\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! feed_url = "https://example.com/iocs.csv"
//! default_format = "text"
//! fail_on_find = true
//!
//! [ignore]
//! packages = ["@internal/*"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::ioc::DEFAULT_FEED_URL;

/// Application configuration.
///
/// Command-line flags override these values for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL of the indicator CSV.
    ///
    /// Default: the Shai-Hulud 2 package list
    pub feed_url: String,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "text", "json"
    /// Default: "text"
    pub default_format: String,

    /// Exit with status 1 whenever anything is found.
    ///
    /// Default: false
    pub fail_on_find: bool,

    /// Findings to suppress.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Packages whose findings are not reported.
///
/// Artifact files and directories are never suppressed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names to skip. Supports `*` wildcards (e.g. "@internal/*").
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    pub fn should_ignore_package(&self, package: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, package)
            } else {
                pattern == package
            }
        })
    }
}

/// Minimal glob matching where `*` matches any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    let first = parts[0];
    if !remaining.starts_with(first) {
        return false;
    }
    remaining = &remaining[first.len()..];

    let last = parts[parts.len() - 1];
    if !remaining.ends_with(last) {
        return false;
    }
    remaining = &remaining[..remaining.len() - last.len()];

    for part in parts[1..parts.len() - 1].iter().filter(|p| !p.is_empty()) {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            default_format: "text".to_string(),
            fail_on_find: false,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("iocscan")
            .join("config.toml")
    }

    pub fn generate_default_config() -> String {
        toml::to_string_pretty(&Config::default()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("@types/*", "@types/node"));
        assert!(!glob_match("@types/*", "@babel/core"));
        assert!(glob_match("*-cli", "eslint-cli"));
        assert!(glob_match("*toast*", "ngx-toastr"));
        assert!(glob_match("a*b*c", "a-b-c"));
        assert!(!glob_match("a*b*c", "a-c"));
        assert!(!glob_match("ab*ba", "aba"));
    }

    #[test]
    fn test_ignore_packages() {
        let ignore = IgnoreConfig {
            packages: vec!["left-pad".to_string(), "@internal/*".to_string()],
        };

        assert!(ignore.should_ignore_package("left-pad"));
        assert!(ignore.should_ignore_package("@internal/ui"));
        assert!(!ignore.should_ignore_package("left-pad-extra"));
        assert!(!ignore.should_ignore_package("@ctrl/tinycolor"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.default_format, "text");
        assert!(!config.fail_on_find);
        assert!(config.ignore.packages.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml("fail_on_find = true\n").unwrap();

        assert!(config.fail_on_find);
        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert_eq!(config.default_format, "text");
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = Config::generate_default_config();
        let config = Config::from_toml(&text).unwrap();

        assert_eq!(config.feed_url, DEFAULT_FEED_URL);
        assert!(!config.fail_on_find);
    }
}
