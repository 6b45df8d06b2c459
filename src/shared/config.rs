use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::shared::errors::AppError;

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "Config.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JupiterCfg {
    pub quote_url: String,
    pub tokens_url: String,
}

impl Default for JupiterCfg {
    fn default() -> Self {
        Self {
            quote_url: "https://quote-api.jup.ag/v6/quote".to_string(),
            tokens_url: "https://token.jup.ag/all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpCfg {
    pub timeout_secs: u64,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheCfg {
    pub token_ttl_secs: u64,
}

impl Default for CacheCfg {
    fn default() -> Self {
        Self { token_ttl_secs: 3600 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsCfg {
    pub slippage_bps: u16,
    pub amount: u64,
}

impl Default for DefaultsCfg {
    fn default() -> Self {
        Self {
            slippage_bps: 50,
            // 1 USDC
            amount: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub jupiter: JupiterCfg,
    pub http: HttpCfg,
    pub cache: CacheCfg,
    pub defaults: DefaultsCfg,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            jupiter: JupiterCfg::default(),
            http: HttpCfg::default(),
            cache: CacheCfg::default(),
            defaults: DefaultsCfg::default(),
        }
    }
}

impl AppConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.token_ttl_secs)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        toml::from_str(content)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {}", e)))
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration. An explicit path must exist; a missing default
    /// `Config.toml` falls back to built-in defaults.
    pub fn load_config(path: Option<&Path>) -> Result<AppConfig, AppError> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };

        if !explicit && !path.exists() {
            return Ok(AppConfig::default());
        }

        let config_content = fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        AppConfig::from_toml_str(&config_content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = AppConfig::from_toml_str(
            r#"
            log_level = "debug"

            [cache]
            token_ttl_secs = 60
            "#,
        )
        .unwrap();

        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.token_ttl(), Duration::from_secs(60));
        assert_eq!(cfg.http.timeout_secs, 15);
        assert_eq!(cfg.defaults.slippage_bps, 50);
        assert_eq!(cfg.jupiter.quote_url, "https://quote-api.jup.ag/v6/quote");
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let err = AppConfig::from_toml_str("[http]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = ConfigLoader::load_config(Some(Path::new("/nonexistent/routeviz.toml"))).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
