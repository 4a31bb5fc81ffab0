use std::env;

use crate::env_parse;

/// Listener settings and request limits.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum request body size; posts embed their image, so this is generous.
    pub body_limit_bytes: usize,
    pub metrics_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            body_limit_bytes: 30 * 1024 * 1024,
            metrics_port: 9090,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),
            body_limit_bytes: env_parse("BODY_LIMIT_BYTES", defaults.body_limit_bytes),
            metrics_port: env_parse("METRICS_PORT", defaults.metrics_port),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
