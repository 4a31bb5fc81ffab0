use std::env;
use std::fmt;
use std::str::FromStr;

use crate::env_parse;

/// Which document store backs the repositories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Postgres => f.write_str("postgres"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl StorageConfig {
    /// Reads `STORAGE_BACKEND`, `DATABASE_URL` and `DATABASE_MAX_CONNECTIONS`.
    ///
    /// Without an explicit backend, PostgreSQL is used when `DATABASE_URL` is
    /// set and the in-memory store otherwise.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Falling back to the in-memory store");
                StorageBackend::Memory
            }),
            Err(_) if database_url.is_some() => StorageBackend::Postgres,
            Err(_) => StorageBackend::Memory,
        };

        Self {
            backend,
            database_url,
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 10),
        }
    }
}
