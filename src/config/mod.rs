use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::pagination::DEFAULT_RESPONSE_LIMIT;

/// Process-wide configuration, read once at startup and immutable after.
/// Safe for unsynchronized concurrent reads across simultaneous requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Caption provider settings
    pub providers: ProvidersConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Explicit token-provider base URL. Well-known local addresses are
    /// probed even when this is unset; absence of a reachable provider
    /// only disables bypass tokens.
    pub pot_provider_url: Option<String>,

    /// Timeout for the structured-API strategy, in seconds
    pub api_timeout_secs: u64,

    /// Timeout for the yt-dlp fallback strategy, in seconds
    pub ytdlp_timeout_secs: u64,

    /// Token-provider liveness probe timeout, in milliseconds
    pub pot_probe_timeout_ms: u64,

    /// Preferred caption languages, in priority order
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default maximum characters per response page
    pub default_response_limit: usize,

    /// End-to-end request budget, in seconds
    pub request_timeout_secs: u64,

    /// Path to the yt-dlp binary
    pub ytdlp_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig {
                pot_provider_url: None,
                api_timeout_secs: 15,
                ytdlp_timeout_secs: 90,
                pot_probe_timeout_ms: 1500,
                languages: vec!["en".to_string()],
            },
            app: AppConfig {
                default_response_limit: DEFAULT_RESPONSE_LIMIT,
                request_timeout_secs: 120,
                ytdlp_path: "yt-dlp".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from file (if present), then apply environment
    /// overrides. Missing file means defaults, not an error.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            serde_yaml::from_str(&content).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("ytscript").join("config.yaml"))
    }

    /// Environment overrides, read once here and never again
    fn apply_env_overrides(&mut self) {
        if let Some(url) = env_var("YTSCRIPT_POT_PROVIDER_URL") {
            self.providers.pot_provider_url = Some(url);
        }
        if let Some(secs) = env_parse::<u64>("YTSCRIPT_API_TIMEOUT_SECS") {
            self.providers.api_timeout_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("YTSCRIPT_YTDLP_TIMEOUT_SECS") {
            self.providers.ytdlp_timeout_secs = secs;
        }
        if let Some(secs) = env_parse::<u64>("YTSCRIPT_REQUEST_TIMEOUT_SECS") {
            self.app.request_timeout_secs = secs;
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.providers.api_timeout_secs == 0 || self.providers.ytdlp_timeout_secs == 0 {
            anyhow::bail!("Strategy timeouts must be greater than zero");
        }
        if self.app.request_timeout_secs == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }
        if self.providers.languages.is_empty() {
            anyhow::bail!("At least one caption language must be configured");
        }
        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!(
            "  Token provider URL: {}",
            self.providers
                .pot_provider_url
                .as_deref()
                .unwrap_or("(auto-detect)")
        );
        println!("  API timeout: {}s", self.providers.api_timeout_secs);
        println!("  yt-dlp timeout: {}s", self.providers.ytdlp_timeout_secs);
        println!("  Request timeout: {}s", self.app.request_timeout_secs);
        println!("  Languages: {}", self.providers.languages.join(", "));
        println!("  Default page size: {} chars", self.app.default_response_limit);
        println!("  yt-dlp path: {}", self.app.ytdlp_path);
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_var(key).and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.app.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_languages_rejected() {
        let mut config = Config::default();
        config.providers.languages.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.app.request_timeout_secs, config.app.request_timeout_secs);
        assert_eq!(parsed.providers.languages, config.providers.languages);
    }
}
