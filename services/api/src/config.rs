//! Service configuration read from the environment

use anyhow::{Result, bail};
use std::env;
use std::net::SocketAddr;

/// Where records are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// API service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Front-end origin allowed by CORS
    pub cors_allowed_origin: String,
    pub storage: StorageBackend,
    /// Apply schema migrations on startup (PostgreSQL only)
    pub run_migrations: bool,
}

impl ApiConfig {
    /// Create a new ApiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `API_HOST`: bind address (default: "0.0.0.0")
    /// - `API_PORT`: listen port (default: 3001)
    /// - `CORS_ALLOWED_ORIGIN`: allowed origin (default: "http://localhost:4200")
    /// - `STORAGE_BACKEND`: "postgres" or "memory" (default: "postgres")
    /// - `RUN_MIGRATIONS`: apply migrations at startup (default: true)
    pub fn from_env() -> Result<Self> {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("API_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3001);

        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:4200".to_string());

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => bail!("Unknown STORAGE_BACKEND: {}", other),
        };

        let run_migrations = env::var("RUN_MIGRATIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        Ok(Self {
            host,
            port,
            cors_allowed_origin,
            storage,
            run_migrations,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
