//! # Memories Models
//!
//! Domain models and DTOs for the Memories API.
//!
//! - [`ids`]: Strongly-typed identifiers
//! - [`posts`]: Posts, post DTOs and search criteria
//! - [`users`]: Users and the sign-in/sign-up DTOs
//!
//! Wire format is camelCase JSON; a post's identifier is serialized as `_id`.

pub mod ids;
pub mod posts;
pub mod users;

pub use ids::{PostId, UserId};
pub use posts::{
    CommentDto, CreatePostDto, MessageResponse, PaginatedPostsResponse, Post, PostChanges,
    PostSearch, SearchParams, SearchPostsResponse, UpdatePostDto,
};
pub use users::{AuthResponse, NewUser, SignInRequest, SignUpRequest, User, UserCredentials};
