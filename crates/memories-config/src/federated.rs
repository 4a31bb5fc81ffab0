use std::env;

use crate::env_list;

/// Key material used to verify federated identity tokens.
#[derive(Clone, Debug)]
pub enum FederatedKey {
    /// PEM-encoded RSA public key (RS256), as published by the identity provider.
    RsaPem(String),
    /// Shared secret (HS256), for providers or test setups that use one.
    Secret(String),
}

/// Verification settings for tokens issued by an external identity provider.
///
/// When `key` is `None` federated tokens are rejected outright.
#[derive(Clone, Debug)]
pub struct FederatedConfig {
    pub key: Option<FederatedKey>,
    pub issuers: Vec<String>,
    pub audience: Option<String>,
}

impl FederatedConfig {
    pub fn from_env() -> Self {
        let key = match (
            env::var("FEDERATED_JWT_PUBLIC_KEY"),
            env::var("FEDERATED_JWT_SECRET"),
        ) {
            (Ok(pem), _) if !pem.trim().is_empty() => {
                Some(FederatedKey::RsaPem(pem.replace("\\n", "\n")))
            }
            (_, Ok(secret)) if !secret.is_empty() => Some(FederatedKey::Secret(secret)),
            _ => None,
        };

        Self {
            key,
            issuers: env_list(
                "FEDERATED_ISSUERS",
                "https://accounts.google.com,accounts.google.com",
            ),
            audience: env::var("FEDERATED_AUDIENCE")
                .ok()
                .filter(|aud| !aud.trim().is_empty()),
        }
    }

    /// A configuration that rejects every federated token.
    pub fn disabled() -> Self {
        Self {
            key: None,
            issuers: Vec::new(),
            audience: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }
}
