//! Data models for seeding configuration.

/// Seed data for creating a user.
pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserSeed {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// How much activity each seeded post receives.
#[derive(Clone)]
pub struct EngagementPerPost {
    pub max_likes: usize,
    pub max_comments: usize,
}

impl Default for EngagementPerPost {
    fn default() -> Self {
        Self {
            max_likes: 5,
            max_comments: 3,
        }
    }
}

/// Complete configuration for database seeding.
#[derive(Clone)]
pub struct SeedConfig {
    pub num_users: usize,
    pub posts_per_user: usize,
    pub engagement: EngagementPerPost,
    /// Posts are back-dated up to this many days
    pub spread_days: i64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            num_users: 5,
            posts_per_user: 4,
            engagement: EngagementPerPost::default(),
            spread_days: 30,
        }
    }
}

impl SeedConfig {
    pub fn new(num_users: usize) -> Self {
        Self {
            num_users,
            ..Default::default()
        }
    }

    pub fn with_posts_per_user(mut self, posts_per_user: usize) -> Self {
        self.posts_per_user = posts_per_user;
        self
    }

    pub fn with_engagement(mut self, engagement: EngagementPerPost) -> Self {
        self.engagement = engagement;
        self
    }

    pub fn total_posts(&self) -> usize {
        self.num_users * self.posts_per_user
    }
}

/// What a seeding run inserted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub posts: usize,
    pub likes: usize,
    pub comments: usize,
}
