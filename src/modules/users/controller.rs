use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use memories_core::AppError;
use memories_models::{AuthResponse, SignInRequest, SignUpRequest};

use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/user/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Invalid credentials"),
        (status = 404, description = "User doesn't exist"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let response = UserService::sign_in(state.users.as_ref(), &state.jwt_config, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/user/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "User created and signed in", body = AuthResponse),
        (status = 400, description = "Passwords don't match or user already exists"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = UserService::sign_up(state.users.as_ref(), &state.jwt_config, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
