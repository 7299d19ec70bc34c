//! Server configuration for the authentication service

use anyhow::Result;
use config::{Config, Environment};
use serde::Deserialize;

/// Read from `AUTH_HOST`, `AUTH_PORT` and `AUTH_CORS_ORIGIN`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .set_default("cors_origin", "http://localhost:5173")?
            .add_source(Environment::with_prefix("AUTH").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

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
