use std::env;

use crate::env_parse;

/// Settings for tokens issued and signed by this service.
///
/// Locally issued tokens carry `kid = key_id` in their JOSE header; that tag
/// is how the auth middleware tells them apart from federated tokens.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub issuer: String,
    pub key_id: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        let secret = env::var("JWT_SECRET")
            .or_else(|_| env::var("JSON_SECRET"))
            .unwrap_or_else(|_| {
                tracing::warn!("JWT_SECRET is not set, using an insecure development secret");
                "your-secret-key-change-in-production".to_string()
            });

        Self {
            secret,
            access_token_expiry: env_parse("JWT_ACCESS_EXPIRY", 3600), // 1 hour
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "memories-api".to_string()),
            key_id: env::var("JWT_KEY_ID").unwrap_or_else(|_| "memories-local".to_string()),
        }
    }
}
