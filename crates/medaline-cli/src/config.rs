//! Configuration loading from TOML files

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for medaline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub countries: CountriesConfig,
    pub deepseek: DeepseekConfig,
    pub enrich: EnrichConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Candidate paths for the athlete-event CSV, tried in order
    pub paths: Vec<PathBuf>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                PathBuf::from("data/athlete_events.csv"),
                PathBuf::from("./data/athlete_events.csv"),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub raw_path: PathBuf,
    pub enriched_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/raw_data.csv"),
            enriched_path: PathBuf::from("data/enriched/enriched_data.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountriesConfig {
    pub base_url: String,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            base_url: medaline_countries::DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeepseekConfig {
    pub api_url: String,
    pub model: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
}

impl Default for DeepseekConfig {
    fn default() -> Self {
        Self {
            api_url: medaline_enrich::config::DEFAULT_API_URL.to_string(),
            model: medaline_enrich::config::DEFAULT_MODEL.to_string(),
            api_key: std::env::var("DEEPSEEK_API_KEY").ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub batch_size: usize,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            batch_size: medaline_enrich::config::DEFAULT_BATCH_SIZE,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./medaline.toml (current directory)
    /// 2. ~/.config/medaline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        // Try current directory first
        let local_config = PathBuf::from("medaline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Try user config directory
        if let Some(config_dir) = directories::ProjectDirs::from("", "", "medaline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config found
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Stage config for the populate step.
    pub fn countries_config(&self) -> medaline_countries::Config {
        medaline_countries::Config {
            base_url: self.countries.base_url.clone(),
        }
    }

    /// Stage config for the enrichment step. The credential becomes an
    /// explicit value here; the stage validates it before doing any work.
    pub fn enrich_config(&self, batch_size: Option<usize>) -> medaline_enrich::Config {
        medaline_enrich::Config {
            api_url: self.deepseek.api_url.clone(),
            api_key: self.deepseek.api_key.clone().unwrap_or_default(),
            model: self.deepseek.model.clone(),
            batch_size: batch_size.unwrap_or(self.enrich.batch_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.input.paths.len(), 2);
        assert_eq!(config.output.raw_path, PathBuf::from("data/raw/raw_data.csv"));
        assert_eq!(
            config.output.enriched_path,
            PathBuf::from("data/enriched/enriched_data.csv")
        );
        assert!(config.countries.base_url.starts_with("https://restcountries.com/"));
        assert_eq!(config.enrich.batch_size, 25);
    }

    #[test]
    fn expand_env_var_simple() {
        std::env::set_var("TEST_MEDALINE_VAR", "test_value");
        assert_eq!(
            expand_env_var("${TEST_MEDALINE_VAR}"),
            Some("test_value".to_string())
        );
        std::env::remove_var("TEST_MEDALINE_VAR");
    }

    #[test]
    fn expand_env_var_literal() {
        assert_eq!(expand_env_var("literal"), Some("literal".to_string()));
    }

    #[test]
    fn expand_env_var_missing() {
        assert_eq!(expand_env_var("${NONEXISTENT_VAR_12345}"), None);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[input]
paths = ["/tmp/events.csv"]

[output]
raw_path = "/tmp/raw.csv"

[deepseek]
model = "deepseek-reasoner"
api_key = "sk-test"

[enrich]
batch_size = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.input.paths, vec![PathBuf::from("/tmp/events.csv")]);
        assert_eq!(config.output.raw_path, PathBuf::from("/tmp/raw.csv"));
        // Unspecified sections/fields keep their defaults
        assert_eq!(
            config.output.enriched_path,
            PathBuf::from("data/enriched/enriched_data.csv")
        );
        assert_eq!(config.deepseek.model, "deepseek-reasoner");
        assert_eq!(config.deepseek.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.enrich.batch_size, 10);
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[enrich]\nbatch_size = 5").unwrap();

        let config = Config::from_file(&file.path().to_path_buf()).unwrap();
        assert_eq!(config.enrich.batch_size, 5);
    }

    #[test]
    fn enrich_config_batch_override() {
        let config = Config::default();
        assert_eq!(config.enrich_config(Some(7)).batch_size, 7);
        assert_eq!(config.enrich_config(None).batch_size, 25);
    }
}
