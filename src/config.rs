use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Settings for fetching pages.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_timeout(),
        }
    }
}

impl ExtractorConfig {
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; RecipeImportBot/1.0)".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Load configuration from file and environment variables
///
/// Priority, highest first:
/// 1. Environment variables with the RECIPE_IMPORT prefix
/// 2. config.toml in the current directory
/// 3. Default values
///
/// Environment variable format: RECIPE_IMPORT__TIMEOUT=10
pub fn load_config() -> Result<ExtractorConfig, ConfigError> {
    let settings = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("RECIPE_IMPORT")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_values() {
        let config = ExtractorConfig::default();
        assert_eq!(config.timeout, 30);
        assert_eq!(config.timeout_duration(), Duration::from_secs(30));
        assert!(config.user_agent.contains("RecipeImportBot"));
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let config: ExtractorConfig = Config::builder()
            .add_source(File::from_str("timeout = 5", FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.timeout, 5);
        assert_eq!(config.user_agent, default_user_agent());
    }

    #[test]
    fn test_load_config_without_file() {
        // Only asserts that a missing config.toml is not an error
        let result = load_config();
        assert!(result.is_ok());
    }
}
