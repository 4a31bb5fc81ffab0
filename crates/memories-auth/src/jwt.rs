//! Token issuing and verification.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use memories_config::{FederatedConfig, FederatedKey, JwtConfig};
use memories_core::AppError;

use crate::claims::{FederatedClaims, LocalClaims};
use crate::principal::Principal;
use crate::token::{TokenKind, classify};

/// Issues a local access token for a signed-in user.
///
/// The token is HS256-signed with `jwt_config.secret` and tagged with
/// `kid = jwt_config.key_id`.
pub fn create_access_token(
    user_id: &str,
    email: &str,
    name: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = LocalClaims {
        id: user_id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        iss: jwt_config.issuer.clone(),
        exp,
        iat: now,
    };

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(jwt_config.key_id.clone());

    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies signature, expiry and issuer of a local token.
pub fn verify_local_token(token: &str, jwt_config: &JwtConfig) -> Result<LocalClaims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[jwt_config.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss"]);

    decode::<LocalClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!(error = %e, "Local token rejected");
        AppError::unauthorized(anyhow!("Invalid or expired token"))
    })
}

/// Verifies a token issued by the configured identity provider.
///
/// Fails when no federated key is configured.
pub fn verify_federated_token(
    token: &str,
    federated_config: &FederatedConfig,
) -> Result<FederatedClaims, AppError> {
    let key = federated_config
        .key
        .as_ref()
        .ok_or_else(|| AppError::unauthorized(anyhow!("Federated sign-in is not enabled")))?;

    let (decoding_key, algorithm) = match key {
        FederatedKey::RsaPem(pem) => (
            DecodingKey::from_rsa_pem(pem.as_bytes())
                .map_err(|e| AppError::internal(anyhow!("Invalid federated public key: {}", e)))?,
            Algorithm::RS256,
        ),
        FederatedKey::Secret(secret) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
    };

    let mut validation = Validation::new(algorithm);
    if !federated_config.issuers.is_empty() {
        validation.set_issuer(federated_config.issuers.as_slice());
    }
    match &federated_config.audience {
        Some(audience) => validation.set_audience(&[audience.as_str()]),
        None => validation.validate_aud = false,
    }
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<FederatedClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            tracing::debug!(error = %e, "Federated token rejected");
            AppError::unauthorized(anyhow!("Invalid or expired token"))
        })?;

    if claims.sub.trim().is_empty() {
        return Err(AppError::unauthorized(anyhow!("Token has no subject")));
    }

    Ok(claims)
}

/// Classifies and verifies a bearer token, returning the acting principal.
pub fn authenticate(
    token: &str,
    jwt_config: &JwtConfig,
    federated_config: &FederatedConfig,
) -> Result<Principal, AppError> {
    match classify(token, jwt_config)? {
        TokenKind::Local => verify_local_token(token, jwt_config).map(Principal::from),
        TokenKind::Federated => {
            verify_federated_token(token, federated_config).map(Principal::from)
        }
    }
}
