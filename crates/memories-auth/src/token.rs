//! Bearer header parsing and token classification.

use anyhow::anyhow;
use jsonwebtoken::decode_header;

use memories_config::JwtConfig;
use memories_core::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Local,
    Federated,
}

/// Extracts the token from an `Authorization` header value.
///
/// The scheme must be `Bearer` (any case) followed by exactly one token.
pub fn parse_bearer(header_value: &str) -> Result<&str, AppError> {
    let (scheme, token) = header_value
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer")
        || token.is_empty()
        || token.contains(char::is_whitespace)
    {
        return Err(AppError::unauthorized(anyhow!(
            "Invalid authorization header format"
        )));
    }

    Ok(token)
}

/// Decides which verifier a token belongs to from the `kid` in its header.
pub fn classify(token: &str, jwt_config: &JwtConfig) -> Result<TokenKind, AppError> {
    let header =
        decode_header(token).map_err(|_| AppError::unauthorized(anyhow!("Malformed token")))?;

    match header.kid.as_deref() {
        Some(kid) if kid == jwt_config.key_id => Ok(TokenKind::Local),
        _ => Ok(TokenKind::Federated),
    }
}
