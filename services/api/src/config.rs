//! Server configuration for the API service

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Server configuration, read from `API_*` environment variables
///
/// # Environment Variables
/// - `API_HOST`: bind address (default: "0.0.0.0")
/// - `API_PORT`: bind port (default: 3001)
/// - `API_CORS_ORIGIN`: comma-separated allowed browser origins (default: "http://localhost:5173")
/// - `API_POKEAPI_URL`: catalog base URL (default: "https://pokeapi.co/api/v2")
/// - `API_CATALOG_CACHE_TTL`: catalog cache TTL in seconds (default: 3600)
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub pokeapi_url: String,
    pub catalog_cache_ttl: u64,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("cors_origin", "http://localhost:5173")?
            .set_default("pokeapi_url", "https://pokeapi.co/api/v2")?
            .set_default("catalog_cache_ttl", 3600)?
            .add_source(Environment::with_prefix("API").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Allowed CORS origins
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_origin
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 5] = [
        "API_HOST",
        "API_PORT",
        "API_CORS_ORIGIN",
        "API_POKEAPI_URL",
        "API_CATALOG_CACHE_TTL",
    ];

    fn clear_env() {
        for var in VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        clear_env();

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.cors_origins(), ["http://localhost:5173"]);
        assert_eq!(config.pokeapi_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.catalog_cache_ttl, 3600);
    }

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        clear_env();
        unsafe {
            std::env::set_var("API_PORT", "8080");
            std::env::set_var("API_CORS_ORIGIN", "http://a.test, http://b.test");
            std::env::set_var("API_CATALOG_CACHE_TTL", "60");
        }

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins(), ["http://a.test", "http://b.test"]);
        assert_eq!(config.catalog_cache_ttl, 60);

        clear_env();
    }
}
