//! # Memories DB
//!
//! The document store behind the Memories API, expressed as two repository
//! traits with two backends:
//!
//! - [`postgres`]: PostgreSQL via SQLx (production)
//! - [`memory`]: an in-process store (local development and tests)
//!
//! Like toggling and comment appends are single atomic operations in both
//! backends, so concurrent likes on the same post never lose updates.
//!
//! # Example
//!
//! ```ignore
//! use memories_config::StorageConfig;
//! use memories_db::init_repositories;
//!
//! let repos = init_repositories(&StorageConfig::from_env()).await?;
//! let page = repos.posts.list_page(6, 0).await?;
//! ```

use std::sync::Arc;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use memories_config::{StorageBackend, StorageConfig};
use memories_models::{NewUser, Post, PostChanges, PostId, PostSearch, User, UserCredentials};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryPostRepository, MemoryUserRepository};
pub use postgres::{PgPostRepository, PgUserRepository};
pub use sqlx::PgPool;

/// Migrations embedded at compile time from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Persistence contract for posts.
///
/// Mutations addressed to an unknown id return `Ok(None)` / `Ok(false)`.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn count(&self) -> anyhow::Result<i64>;

    /// Newest-first page of posts.
    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>>;

    /// Newest-first posts matching the criteria. An empty search matches nothing.
    async fn search(&self, search: &PostSearch) -> anyhow::Result<Vec<Post>>;

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>>;

    async fn insert(&self, post: &Post) -> anyhow::Result<Post>;

    async fn update(&self, id: PostId, changes: &PostChanges) -> anyhow::Result<Option<Post>>;

    async fn delete(&self, id: PostId) -> anyhow::Result<bool>;

    /// Atomically adds `user_id` to the likes, or removes it if present.
    async fn toggle_like(&self, id: PostId, user_id: &str) -> anyhow::Result<Option<Post>>;

    /// Atomically appends a comment.
    async fn append_comment(&self, id: PostId, comment: &str) -> anyhow::Result<Option<Post>>;
}

/// Persistence contract for locally registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks a user up by normalized (lowercased) email.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserCredentials>>;

    /// Inserts a user; `Ok(None)` when the email is already registered.
    async fn insert(&self, user: &NewUser) -> anyhow::Result<Option<User>>;
}

/// The repositories the application runs against.
#[derive(Clone)]
pub struct Repositories {
    pub posts: Arc<dyn PostRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(MemoryPostRepository::default()),
            users: Arc::new(MemoryUserRepository::default()),
        }
    }

    pub fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }
}

/// Connects to PostgreSQL and applies pending migrations.
pub async fn init_db_pool(config: &StorageConfig) -> anyhow::Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("DATABASE_URL must be set for the postgres storage backend"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    Ok(pool)
}

/// Builds the repositories for the configured backend.
pub async fn init_repositories(config: &StorageConfig) -> anyhow::Result<Repositories> {
    info!(storage.backend = %config.backend, "Initializing document store");

    match config.backend {
        StorageBackend::Postgres => Ok(Repositories::postgres(init_db_pool(config).await?)),
        StorageBackend::Memory => Ok(Repositories::in_memory()),
    }
}
