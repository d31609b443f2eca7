pub mod session;

use std::env;
use std::net::{IpAddr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

/// Process configuration read from the environment (and `.env` in development).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let host = match env::var("HOST") {
            Ok(host) => host
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::Invalid(format!("HOST {:?}: {}", host, e)))?,
            Err(_) => DEFAULT_HOST
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("default host: {}", e)))?,
        };

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid(format!("PORT {:?}: {}", port, e)))?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            database_url,
            host,
            port,
            environment: current_environment(),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

pub(crate) fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

pub(crate) fn env_flag_enabled(key: &str) -> bool {
    env::var(key)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(false)
}
