//! In-process repositories.
//!
//! Every mutation runs under the store's write lock, so a like toggle or a
//! comment append is atomic with respect to other requests.

use std::collections::HashMap;

use anyhow::bail;
use async_trait::async_trait;
use tokio::sync::RwLock;

use memories_models::posts::newest_first;
use memories_models::{NewUser, Post, PostChanges, PostId, PostSearch, User, UserCredentials};

use crate::{PostRepository, UserRepository};

#[derive(Debug, Default)]
pub struct MemoryPostRepository {
    posts: RwLock<HashMap<PostId, Post>>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(posts: impl Iterator<Item = Post>) -> Vec<Post> {
        let mut posts: Vec<Post> = posts.collect();
        posts.sort_by(newest_first);
        posts
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn count(&self) -> anyhow::Result<i64> {
        Ok(self.posts.read().await.len() as i64)
    }

    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>> {
        let posts = self.posts.read().await;
        let sorted = Self::sorted(posts.values().cloned());
        Ok(sorted
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn search(&self, search: &PostSearch) -> anyhow::Result<Vec<Post>> {
        let posts = self.posts.read().await;
        Ok(Self::sorted(
            posts.values().filter(|post| search.matches(post)).cloned(),
        ))
    }

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: &Post) -> anyhow::Result<Post> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            bail!("Post {} already exists", post.id);
        }
        posts.insert(post.id, post.clone());
        Ok(post.clone())
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> anyhow::Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(&id).map(|post| {
            changes.apply(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: PostId) -> anyhow::Result<bool> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn toggle_like(&self, id: PostId, user_id: &str) -> anyhow::Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(&id).map(|post| {
            post.toggle_like(user_id);
            post.clone()
        }))
    }

    async fn append_comment(&self, id: PostId, comment: &str) -> anyhow::Result<Option<Post>> {
        let mut posts = self.posts.write().await;
        Ok(posts.get_mut(&id).map(|post| {
            post.comments.push(comment.to_string());
            post.clone()
        }))
    }
}

/// Users keyed by normalized email.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, UserCredentials>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Ok(None);
        }

        let created = user.to_user();
        users.insert(
            user.email.clone(),
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(Some(created))
    }
}
