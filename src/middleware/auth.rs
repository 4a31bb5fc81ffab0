use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use memories_auth::{Principal, parse_bearer};
use memories_core::AppError;

use crate::state::AppState;

fn principal_from_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<Option<Principal>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized(anyhow!("Invalid authorization header format")))?;
    let token = parse_bearer(value)?;

    memories_auth::authenticate(token, &state.jwt_config, &state.federated_config).map(Some)
}

/// Verifies the bearer token, if any, and attaches the caller's [`Principal`].
///
/// Requests without an `Authorization` header pass through anonymously.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(principal) = principal_from_headers(req.headers(), &state)? {
        tracing::debug!(user_id = %principal.user_id, kind = ?principal.kind, "Authenticated request");
        req.extensions_mut().insert(principal);
    }

    Ok(next.run(req).await)
}

/// Extractor for routes that require a signed-in caller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(anyhow!("Authentication required")))
    }
}
