//! # Memories Core
//!
//! Core types, errors, and utilities for the Memories API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Page arithmetic for the post feed
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Query-string deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use memories_core::{AppError, PageParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("No post with id: {}", id));
//!
//! let params = PageParams { page: Some(3) };
//! let offset = params.offset(6);
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PageParams, number_of_pages};
pub use password::{hash_password, verify_password};
