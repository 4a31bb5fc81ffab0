use anyhow::anyhow;
use tracing::{info, instrument, warn};

use memories_auth::Principal;
use memories_core::{AppError, PageParams, number_of_pages};
use memories_db::PostRepository;
use memories_models::{
    CommentDto, CreatePostDto, MessageResponse, PaginatedPostsResponse, Post, PostChanges, PostId,
    PostSearch, SearchPostsResponse, UpdatePostDto,
};

use crate::metrics::{track_comment_added, track_like_toggled, track_post_created, track_post_deleted};

/// Posts per feed page.
pub const POSTS_PAGE_SIZE: i64 = 6;

fn post_not_found(id: PostId) -> AppError {
    AppError::not_found(anyhow!("No post with id: {}", id))
}

pub struct PostService;

impl PostService {
    #[instrument(skip(posts))]
    pub async fn get_posts(
        posts: &dyn PostRepository,
        params: PageParams,
    ) -> Result<PaginatedPostsResponse, AppError> {
        let page = params.page();
        let total = posts.count().await?;
        let data = posts
            .list_page(POSTS_PAGE_SIZE, params.offset(POSTS_PAGE_SIZE))
            .await?;

        Ok(PaginatedPostsResponse {
            data,
            current_page: page,
            number_of_pages: number_of_pages(total, POSTS_PAGE_SIZE),
        })
    }

    #[instrument(skip(posts))]
    pub async fn search_posts(
        posts: &dyn PostRepository,
        search: PostSearch,
    ) -> Result<SearchPostsResponse, AppError> {
        if search.is_empty() {
            return Ok(SearchPostsResponse { data: Vec::new() });
        }

        let data = posts.search(&search).await?;
        Ok(SearchPostsResponse { data })
    }

    #[instrument(skip(posts))]
    pub async fn get_post(posts: &dyn PostRepository, id: PostId) -> Result<Post, AppError> {
        posts.find_by_id(id).await?.ok_or_else(|| post_not_found(id))
    }

    #[instrument(skip(posts, dto), fields(user_id = %principal.user_id))]
    pub async fn create_post(
        posts: &dyn PostRepository,
        dto: CreatePostDto,
        principal: &Principal,
    ) -> Result<Post, AppError> {
        let post = Post::create(dto, &principal.user_id, principal.name.as_deref());

        let created = posts.insert(&post).await.map_err(|e| {
            warn!(error = %e, "Failed to store post");
            AppError::conflict(e)
        })?;

        track_post_created();
        info!(post.id = %created.id, "Post created");
        Ok(created)
    }

    /// Loads the post and checks that `principal` authored it.
    async fn owned_post(
        posts: &dyn PostRepository,
        id: PostId,
        principal: &Principal,
    ) -> Result<Post, AppError> {
        let post = Self::get_post(posts, id).await?;
        if !post.is_created_by(&principal.user_id) {
            return Err(AppError::forbidden(anyhow!(
                "Only the creator can modify this post"
            )));
        }
        Ok(post)
    }

    #[instrument(skip(posts, dto), fields(user_id = %principal.user_id))]
    pub async fn update_post(
        posts: &dyn PostRepository,
        id: PostId,
        dto: UpdatePostDto,
        principal: &Principal,
    ) -> Result<Post, AppError> {
        let existing = Self::owned_post(posts, id, principal).await?;

        let changes = PostChanges::from(dto);
        if changes.is_empty() {
            return Ok(existing);
        }

        posts
            .update(id, &changes)
            .await?
            .ok_or_else(|| post_not_found(id))
    }

    #[instrument(skip(posts), fields(user_id = %principal.user_id))]
    pub async fn delete_post(
        posts: &dyn PostRepository,
        id: PostId,
        principal: &Principal,
    ) -> Result<MessageResponse, AppError> {
        Self::owned_post(posts, id, principal).await?;

        if !posts.delete(id).await? {
            return Err(post_not_found(id));
        }

        track_post_deleted();
        Ok(MessageResponse {
            message: "Post deleted successfully".to_string(),
        })
    }

    #[instrument(skip(posts), fields(user_id = %principal.user_id))]
    pub async fn like_post(
        posts: &dyn PostRepository,
        id: PostId,
        principal: &Principal,
    ) -> Result<Post, AppError> {
        let post = posts
            .toggle_like(id, &principal.user_id)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        track_like_toggled(post.is_liked_by(&principal.user_id));
        Ok(post)
    }

    #[instrument(skip(posts, dto), fields(user_id = %principal.user_id))]
    pub async fn comment_post(
        posts: &dyn PostRepository,
        id: PostId,
        dto: CommentDto,
        principal: &Principal,
    ) -> Result<Post, AppError> {
        let post = posts
            .append_comment(id, &dto.value)
            .await?
            .ok_or_else(|| post_not_found(id))?;

        track_comment_added();
        Ok(post)
    }
}
