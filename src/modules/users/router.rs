use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{sign_in, sign_up};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/signin", post(sign_in))
        .route("/signup", post(sign_up))
}
