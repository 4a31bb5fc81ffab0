//! # Memories CLI
//!
//! Database seeding utilities for Memories testing and development.
//!
//! The seeder writes through the [`memories_db::Repositories`] traits, so it
//! runs against either store backend.
//!
//! ## Usage
//!
//! ```ignore
//! use memories_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(10); // 10 users with defaults
//! seed_all(&repos, config).await?;
//! ```

pub mod seeder;
