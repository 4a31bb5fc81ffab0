//! # Memories Config
//!
//! Configuration types for the Memories API, loaded from environment
//! variables (a `.env` file is honoured by the binaries via `dotenvy`).
//!
//! - [`jwt`]: Locally issued token configuration
//! - [`federated`]: Federated identity token verification
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`storage`]: Document store backend selection
//! - [`server`]: Listener and request limits
//!
//! # Example
//!
//! ```ignore
//! use memories_config::{JwtConfig, StorageConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let storage_config = StorageConfig::from_env();
//! ```

pub mod cors;
pub mod federated;
pub mod jwt;
pub mod server;
pub mod storage;

pub use cors::CorsConfig;
pub use federated::{FederatedConfig, FederatedKey};
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};

pub(crate) fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn env_list(key: &str, default: &str) -> Vec<String> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
