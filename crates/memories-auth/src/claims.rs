//! JWT claim structures.

use serde::{Deserialize, Serialize};

/// Claims of a token issued by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalClaims {
    /// User ID
    pub id: String,
    pub email: String,
    /// Display name
    pub name: String,
    pub iss: String,
    /// Expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// The subset of an identity provider's ID token claims this service reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedClaims {
    /// Provider-scoped user identifier
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federated_claims_ignore_extra_fields() {
        let json = r#"{"sub":"1099","email":"ada@gmail.com","aud":"client","azp":"x","exp":9999999999,"picture":"p"}"#;
        let claims: FederatedClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "1099");
        assert_eq!(claims.name, None);
    }

    #[test]
    fn test_local_claims_serialize() {
        let claims = LocalClaims {
            id: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            iss: "memories-api".to_string(),
            exp: 2,
            iat: 1,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""id":"user-1""#));
        assert!(!serialized.contains("sub"));
    }
}
