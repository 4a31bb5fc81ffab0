#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use memories::router::init_router;
use memories::state::AppState;
use memories_auth::create_access_token;
use memories_config::{CorsConfig, FederatedConfig, FederatedKey, JwtConfig, ServerConfig};
use memories_db::Repositories;

pub const FEDERATED_SECRET: &str = "provider-test-secret";
pub const FEDERATED_ISSUER: &str = "https://accounts.google.com";

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        issuer: "memories-api".to_string(),
        key_id: "memories-local".to_string(),
    }
}

pub fn test_federated_config() -> FederatedConfig {
    FederatedConfig {
        key: Some(FederatedKey::Secret(FEDERATED_SECRET.to_string())),
        issuers: vec![FEDERATED_ISSUER.to_string()],
        audience: None,
    }
}

pub fn test_state(repos: Repositories) -> AppState {
    AppState {
        posts: repos.posts,
        users: repos.users,
        jwt_config: test_jwt_config(),
        federated_config: test_federated_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        server_config: ServerConfig::default(),
    }
}

/// Router over a fresh in-memory store, plus the state it shares.
pub fn setup_test_app() -> (Router, AppState) {
    let state = test_state(Repositories::in_memory());
    (init_router(state.clone()), state)
}

pub fn token_for(user_id: &str, name: &str) -> String {
    create_access_token(
        user_id,
        &format!("{}@example.com", user_id),
        name,
        &test_jwt_config(),
    )
    .unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends a request and returns the status with the JSON body (`Null` if empty or not JSON).
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}
