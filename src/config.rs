use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Initial answer mode for text questions: "quiz" or "flashcard".
    #[serde(default = "default_mode")]
    pub default_mode: String,
    /// Optional path to a custom question bank; the bundled bank otherwise.
    #[serde(default)]
    pub bank_path: Option<String>,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_mode() -> String {
    "quiz".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            default_mode: default_mode(),
            bank_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    /// Reset `default_mode` to "quiz" if a stale config carries an unknown
    /// value. Call after deserialization.
    pub fn normalize_default_mode(&mut self) {
        if self.default_mode != "quiz" && self.default_mode != "flashcard" {
            self.default_mode = default_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_gets_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.default_mode, "quiz");
        assert!(config.bank_path.is_none());
    }

    #[test]
    fn partial_config_keeps_known_fields() {
        let config: Config = toml::from_str("theme = \"catppuccin-mocha\"").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.default_mode, "quiz");
    }

    #[test]
    fn serde_round_trip() {
        let config = Config {
            theme: "catppuccin-mocha".to_string(),
            default_mode: "flashcard".to_string(),
            bank_path: Some("/tmp/bank.json".to_string()),
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.default_mode, deserialized.default_mode);
        assert_eq!(config.bank_path, deserialized.bank_path);
    }

    #[test]
    fn unknown_mode_resets_to_quiz() {
        let mut config = Config {
            default_mode: "speedrun".to_string(),
            ..Default::default()
        };
        config.normalize_default_mode();
        assert_eq!(config.default_mode, "quiz");
    }
}
