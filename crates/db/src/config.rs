//! Environment-driven database configuration.

use std::env;

/// Database settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

impl DatabaseConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;

    /// Load from the environment, reading a `.env` file first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let max_connections = parse_max_connections(env::var("DATABASE_MAX_CONNECTIONS").ok())?;
        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

fn parse_max_connections(raw: Option<String>) -> Result<u32, ConfigError> {
    match raw {
        None => Ok(DatabaseConfig::DEFAULT_MAX_CONNECTIONS),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
            name: "DATABASE_MAX_CONNECTIONS",
            value,
        }),
    }
}
