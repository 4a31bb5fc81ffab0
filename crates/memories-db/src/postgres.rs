//! PostgreSQL repositories.
//!
//! Posts keep `tags`, `likes` and `comments` in `TEXT[]` columns. Likes are
//! toggled and comments appended inside a single `UPDATE ... RETURNING`,
//! which Postgres serializes per row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, instrument};

use memories_models::{
    NewUser, Post, PostChanges, PostId, PostSearch, User, UserCredentials, UserId,
};

use crate::{PostRepository, UserRepository};

const POST_COLUMNS: &str =
    "id, title, message, name, creator, tags, selected_file, likes, comments, created_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: PostId,
    title: String,
    message: String,
    name: String,
    creator: String,
    tags: Vec<String>,
    selected_file: String,
    likes: Vec<String>,
    comments: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            message: row.message,
            name: row.name,
            creator: row.creator,
            tags: row.tags,
            selected_file: row.selected_file,
            likes: row.likes.into_iter().collect(),
            comments: row.comments,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgPostRepository {
    db: PgPool,
}

impl PgPostRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "posts"))]
    async fn count(&self) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.db)
            .await?;
        Ok(total)
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "posts"))]
    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>> {
        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "posts"))]
    async fn search(&self, search: &PostSearch) -> anyhow::Result<Vec<Post>> {
        if search.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE ($1::text IS NOT NULL AND title ILIKE $1::text)
                OR tags && $2::text[]
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(search.title_pattern())
            .bind(&search.tags)
            .fetch_all(&self.db)
            .await?;

        debug!(returned = rows.len(), "Search completed");
        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self), fields(post.id = %id, db.operation = "SELECT", db.table = "posts"))]
    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        let query = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Post::from))
    }

    #[instrument(skip(self, post), fields(post.id = %post.id, db.operation = "INSERT", db.table = "posts"))]
    async fn insert(&self, post: &Post) -> anyhow::Result<Post> {
        let query = format!(
            "INSERT INTO posts (id, title, message, name, creator, tags, selected_file, likes, comments, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {POST_COLUMNS}"
        );
        let likes: Vec<String> = post.likes.iter().cloned().collect();
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.message)
            .bind(&post.name)
            .bind(&post.creator)
            .bind(&post.tags)
            .bind(&post.selected_file)
            .bind(likes)
            .bind(&post.comments)
            .bind(post.created_at)
            .fetch_one(&self.db)
            .await?;
        Ok(row.into())
    }

    #[instrument(skip(self, changes), fields(post.id = %id, db.operation = "UPDATE", db.table = "posts"))]
    async fn update(&self, id: PostId, changes: &PostChanges) -> anyhow::Result<Option<Post>> {
        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                message = COALESCE($3, message),
                tags = COALESCE($4::text[], tags),
                selected_file = COALESCE($5, selected_file)
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(changes.title.as_deref())
            .bind(changes.message.as_deref())
            .bind(changes.tags.as_ref())
            .bind(changes.selected_file.as_deref())
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Post::from))
    }

    #[instrument(skip(self), fields(post.id = %id, db.operation = "DELETE", db.table = "posts"))]
    async fn delete(&self, id: PostId) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(post.id = %id, db.operation = "UPDATE", db.table = "posts"))]
    async fn toggle_like(&self, id: PostId, user_id: &str) -> anyhow::Result<Option<Post>> {
        let query = format!(
            "UPDATE posts SET likes = CASE
                WHEN $2::text = ANY(likes) THEN array_remove(likes, $2::text)
                ELSE array_append(likes, $2::text)
             END
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Post::from))
    }

    #[instrument(skip(self, comment), fields(post.id = %id, db.operation = "UPDATE", db.table = "posts"))]
    async fn append_comment(&self, id: PostId, comment: &str) -> anyhow::Result<Option<Post>> {
        let query = format!(
            "UPDATE posts SET comments = array_append(comments, $2::text)
             WHERE id = $1
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(comment)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Post::from))
    }
}

#[derive(sqlx::FromRow)]
struct UserWithPassword {
    id: UserId,
    name: String,
    email: String,
    password: String,
}

#[derive(Clone, Debug)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self), fields(db.operation = "SELECT", db.table = "users"))]
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| UserCredentials {
            user: User {
                id: row.id,
                name: row.name,
                email: row.email,
            },
            password_hash: row.password,
        }))
    }

    #[instrument(skip(self, user), fields(user.email = %user.email, db.operation = "INSERT", db.table = "users"))]
    async fn insert(&self, user: &NewUser) -> anyhow::Result<Option<User>> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO NOTHING
             RETURNING id, name, email",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(created)
    }
}
