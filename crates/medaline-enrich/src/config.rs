//! Enrichment stage configuration.
//!
//! The credential is an explicit field here, not ambient process state: the
//! caller decides where it comes from, and validation happens before any
//! table work or network call.

use anyhow::{Result, ensure};

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_BATCH_SIZE: usize = 25;

/// Runtime configuration for the enrichment stage
#[derive(Debug, Clone)]
pub struct Config {
    /// Chat-completions endpoint
    pub api_url: String,
    /// Bearer credential for the endpoint
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Rows per request
    pub batch_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Config {
    /// Check the config before the stage does any work.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.api_key.trim().is_empty(),
            "missing enrichment API key; set DEEPSEEK_API_KEY (a .env file works) \
             or [deepseek] api_key in medaline.toml"
        );
        ensure!(self.batch_size > 0, "batch size must be at least 1");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, "deepseek-chat");
        assert_eq!(config.batch_size, 25);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn validate_rejects_missing_key() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let blank = Config {
            api_key: "   ".to_string(),
            ..Config::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_batch() {
        let config = Config {
            api_key: "sk-test".to_string(),
            batch_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_accepts_key_and_batch() {
        let config = Config {
            api_key: "sk-test".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
