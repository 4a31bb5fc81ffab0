//! User seeding.

use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;

use memories_db::UserRepository;
use memories_models::{NewUser, User};

use super::models::UserSeed;

/// Generates users in parallel
pub fn generate_users(count: usize) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let email = format!(
                "{}.{}+seed{}@example.com",
                first_name.to_lowercase(),
                last_name.to_lowercase(),
                idx
            );

            UserSeed {
                first_name,
                last_name,
                email,
            }
        })
        .collect()
}

/// Inserts users sharing one password hash; emails already taken are skipped.
pub async fn seed_users(
    users: &dyn UserRepository,
    count: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<User>> {
    let start_time = Instant::now();
    println!("👥 Seeding {} users...", count);

    let mut created = Vec::with_capacity(count);
    for seed in generate_users(count) {
        let new_user = NewUser::new(&seed.full_name(), &seed.email, password_hash.to_string());
        if let Some(user) = users.insert(&new_user).await? {
            created.push(user);
        }
    }

    println!(
        "   ✓ Inserted {} users in {:?}",
        created.len(),
        start_time.elapsed()
    );

    Ok(created)
}
