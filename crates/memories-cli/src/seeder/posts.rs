//! Post seeding: posts with back-dated timestamps, likes and comments.

use std::time::Instant;

use chrono::{Duration, Utc};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use memories_db::PostRepository;
use memories_models::{CreatePostDto, Post, User};

use super::models::{EngagementPerPost, SeedSummary};

/// Small tag vocabulary so seeded posts are searchable by tag.
pub const SEED_TAGS: &[&str] = &[
    "travel", "food", "family", "friends", "nature", "city", "beach", "music", "sport", "art",
];

/// Generates `per_user` posts for every author, spread over `spread_days`.
pub fn generate_posts(authors: &[User], per_user: usize, spread_days: i64) -> Vec<Post> {
    let spread_minutes = spread_days.max(1) * 24 * 60;

    authors
        .par_iter()
        .flat_map(|author| {
            let mut rng = rand::thread_rng();
            (0..per_user)
                .map(|_| {
                    let tag_count = rng.gen_range(1..=3);
                    let tags = SEED_TAGS
                        .choose_multiple(&mut rng, tag_count)
                        .map(|t| t.to_string())
                        .collect();

                    let dto = CreatePostDto {
                        title: Sentence(2..6).fake::<String>().trim_end_matches('.').to_string(),
                        message: Paragraph(1..4).fake(),
                        tags,
                        selected_file: None,
                        name: None,
                    };

                    let mut post = Post::create(dto, &author.id.to_string(), Some(&author.name));
                    post.created_at =
                        Utc::now() - Duration::minutes(rng.gen_range(0..spread_minutes));
                    post
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Inserts posts, then adds random likes and comments from `audience`.
pub async fn seed_posts(
    posts: &dyn PostRepository,
    generated: Vec<Post>,
    audience: &[User],
    engagement: &EngagementPerPost,
) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();
    println!("📝 Seeding {} posts...", generated.len());

    let mut summary = SeedSummary::default();

    for post in generated {
        let post = posts.insert(&post).await?;
        summary.posts += 1;

        // Generate the random plan before awaiting; ThreadRng is not Send.
        let (likers, comments) = {
            let mut rng = rand::thread_rng();
            let like_count = rng.gen_range(0..=engagement.max_likes.min(audience.len()));
            let likers: Vec<String> = audience
                .choose_multiple(&mut rng, like_count)
                .map(|u| u.id.to_string())
                .collect();
            let comment_count = rng.gen_range(0..=engagement.max_comments);
            let comments: Vec<String> = (0..comment_count)
                .map(|_| Sentence(3..10).fake::<String>())
                .collect();
            (likers, comments)
        };

        for liker in &likers {
            posts.toggle_like(post.id, liker).await?;
            summary.likes += 1;
        }
        for comment in &comments {
            posts.append_comment(post.id, comment).await?;
            summary.comments += 1;
        }
    }

    println!(
        "   ✓ Inserted {} posts ({} likes, {} comments) in {:?}",
        summary.posts,
        summary.likes,
        summary.comments,
        start_time.elapsed()
    );

    Ok(summary)
}
