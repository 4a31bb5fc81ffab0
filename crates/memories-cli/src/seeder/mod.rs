//! Seeding of fake users and posts.

use std::time::Instant;

use anyhow::Context;
use sqlx::PgPool;

use memories_core::hash_password;
use memories_db::Repositories;

pub mod models;
pub mod posts;
pub mod users;

pub use models::{EngagementPerPost, SeedConfig, SeedSummary, UserSeed};

/// Password every seeded user signs in with.
pub const SEED_PASSWORD: &str = "password123";

/// Seeds users, then posts authored by them with likes and comments.
pub async fn seed_all(repos: &Repositories, config: SeedConfig) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!("   - Users: {}", config.num_users);
    println!("   - Posts: {}", config.total_posts());

    let password_hash = hash_password(SEED_PASSWORD).map_err(|e| e.error)?;

    let users = users::seed_users(repos.users.as_ref(), config.num_users, &password_hash).await?;
    let generated = posts::generate_posts(&users, config.posts_per_user, config.spread_days);
    let mut summary =
        posts::seed_posts(repos.posts.as_ref(), generated, &users, &config.engagement).await?;
    summary.users = users.len();

    println!("✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Seeded users sign in with password \"{}\"", SEED_PASSWORD);

    Ok(summary)
}

/// Removes every post, keeping users.
pub async fn clear_posts(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM posts")
        .execute(db)
        .await
        .context("Failed to clear posts")?;
    Ok(result.rows_affected())
}

/// Removes every post and user.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<()> {
    let mut tx = db.begin().await?;
    sqlx::query("DELETE FROM posts").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM users").execute(&mut *tx).await?;
    tx.commit().await?;

    println!("🧹 Cleared all posts and users");
    Ok(())
}
