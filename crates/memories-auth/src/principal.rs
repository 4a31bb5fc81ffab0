use crate::claims::{FederatedClaims, LocalClaims};
use crate::token::TokenKind;

/// The verified identity acting on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub kind: TokenKind,
}

impl From<LocalClaims> for Principal {
    fn from(claims: LocalClaims) -> Self {
        Self {
            user_id: claims.id,
            name: Some(claims.name).filter(|n| !n.is_empty()),
            email: Some(claims.email),
            kind: TokenKind::Local,
        }
    }
}

impl From<FederatedClaims> for Principal {
    fn from(claims: FederatedClaims) -> Self {
        Self {
            user_id: claims.sub,
            name: claims.name,
            email: claims.email,
            kind: TokenKind::Federated,
        }
    }
}
