//! Middleware and extractors for request identity.
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::authenticate`] verifies the token (local or federated) and
//!    stores the resulting [`Principal`](memories_auth::Principal) in the
//!    request extensions; an invalid token ends the request with 401
//! 3. Handlers that need identity take an [`auth::AuthUser`]; handlers that
//!    do not simply ignore it
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn like_post(AuthUser(principal): AuthUser) -> impl IntoResponse {
//!     // principal.user_id is the verified caller
//! }
//! ```

pub mod auth;
