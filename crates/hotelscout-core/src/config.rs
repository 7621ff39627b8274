//! Application configuration.
//!
//! Loaded once at startup from an optional config file
//! (`~/.config/hotelscout/config.toml`), with environment variables taking
//! priority: `RAPID_API_KEY`, `HOTELSCOUT_LOCALE`, `HOTELSCOUT_CURRENCY`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ScoutError};

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_page_size() -> usize {
    25
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RapidAPI key for the hotels endpoints
    #[serde(default)]
    pub rapid_api_key: String,
    /// Locale passed through to the provider
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Currency passed through to the provider
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Fixed page size enforced by the provider
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rapid_api_key: String::new(),
            locale: default_locale(),
            currency: default_currency(),
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration file if present, then applies environment
    /// overrides. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let raw = std::fs::read_to_string(&path)?;
                Self::from_toml_str(&raw)?
            }
            _ => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        if config.page_size == 0 {
            return Err(ScoutError::config("page_size must be positive"));
        }
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("RAPID_API_KEY") {
            self.rapid_api_key = key;
        }
        if let Ok(locale) = std::env::var("HOTELSCOUT_LOCALE") {
            self.locale = locale;
        }
        if let Ok(currency) = std::env::var("HOTELSCOUT_CURRENCY") {
            self.currency = currency;
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hotelscout").join("config.toml"))
    }
}
