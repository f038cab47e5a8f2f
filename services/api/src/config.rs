//! API service configuration
//!
//! Defaults are layered under `FOODGRAM_*` environment variables, e.g.
//! `FOODGRAM_BIND_ADDRESS=127.0.0.1:8080`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Socket address the HTTP server binds to
    pub bind_address: String,
    /// Page size used when a list request carries no `limit`
    pub default_page_size: u32,
    /// Upper bound for any requested `limit`
    pub max_page_size: u32,
    /// Optional JSON catalogue of ingredients imported into an empty table
    pub ingredients_file: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config: ApiConfig = Config::builder()
            .set_default("bind_address", "0.0.0.0:3001")?
            .set_default("default_page_size", 6_i64)?
            .set_default("max_page_size", 100_i64)?
            .add_source(Environment::with_prefix("FOODGRAM").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if config.default_page_size == 0 || config.default_page_size > config.max_page_size {
            return Err(ConfigError::Message(format!(
                "default_page_size must be between 1 and max_page_size ({})",
                config.max_page_size
            )));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var("FOODGRAM_BIND_ADDRESS");
            std::env::remove_var("FOODGRAM_DEFAULT_PAGE_SIZE");
            std::env::remove_var("FOODGRAM_MAX_PAGE_SIZE");
            std::env::remove_var("FOODGRAM_INGREDIENTS_FILE");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = ApiConfig::load().unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3001");
        assert_eq!(config.default_page_size, 6);
        assert_eq!(config.max_page_size, 100);
        assert!(config.ingredients_file.is_none());
    }

    #[test]
    #[serial]
    fn test_environment_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("FOODGRAM_BIND_ADDRESS", "127.0.0.1:8080");
            std::env::set_var("FOODGRAM_DEFAULT_PAGE_SIZE", "10");
            std::env::set_var("FOODGRAM_INGREDIENTS_FILE", "data/ingredients.json");
        }

        let config = ApiConfig::load().unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(
            config.ingredients_file.as_deref(),
            Some("data/ingredients.json")
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_default_above_max() {
        clear_env();
        unsafe {
            std::env::set_var("FOODGRAM_DEFAULT_PAGE_SIZE", "50");
            std::env::set_var("FOODGRAM_MAX_PAGE_SIZE", "20");
        }

        assert!(ApiConfig::load().is_err());

        clear_env();
    }
}
