use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use memories_core::{AppError, PageParams};
use memories_models::{
    CommentDto, CreatePostDto, MessageResponse, PaginatedPostsResponse, Post, PostId, PostSearch,
    SearchParams, SearchPostsResponse, UpdatePostDto,
};

use crate::middleware::auth::AuthUser;
use crate::modules::posts::service::PostService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// A malformed id can never name a post, so it is a 404 before any lookup.
fn parse_post_id(id: &str) -> Result<PostId, AppError> {
    PostId::parse(id).ok_or_else(|| AppError::not_found(anyhow!("No post with id: {}", id)))
}

#[utoipa::path(
    get,
    path = "/posts",
    params(PageParams),
    responses(
        (status = 200, description = "One page of posts, newest first", body = PaginatedPostsResponse),
        (status = 400, description = "Invalid page number")
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PaginatedPostsResponse>, AppError> {
    let page = PostService::get_posts(state.posts.as_ref(), params).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/posts/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Posts whose title contains the query or that carry one of the tags", body = SearchPostsResponse)
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPostsResponse>, AppError> {
    let result = PostService::search_posts(state.posts.as_ref(), PostSearch::from(params)).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post details", body = Post),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts"
)]
#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let post = PostService::get_post(state.posts.as_ref(), id).await?;
    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostDto,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Post could not be stored"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreatePostDto>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let post = PostService::create_post(state.posts.as_ref(), dto, &auth_user.0).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = UpdatePostDto,
    responses(
        (status = 200, description = "Post updated", body = Post),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdatePostDto>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let post = PostService::update_post(state.posts.as_ref(), id, dto, &auth_user.0).await?;
    Ok(Json(post))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the creator"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_post_id(&id)?;
    let message = PostService::delete_post(state.posts.as_ref(), id, &auth_user.0).await?;
    Ok(Json(message))
}

#[utoipa::path(
    patch,
    path = "/posts/{id}/likePost",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    responses(
        (status = 200, description = "Like toggled for the caller", body = Post),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn like_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let post = PostService::like_post(state.posts.as_ref(), id, &auth_user.0).await?;
    Ok(Json(post))
}

#[utoipa::path(
    post,
    path = "/posts/{id}/commentPost",
    params(
        ("id" = String, Path, description = "Post ID")
    ),
    request_body = CommentDto,
    responses(
        (status = 200, description = "Comment appended", body = Post),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Post not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "Posts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn comment_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<CommentDto>,
) -> Result<Json<Post>, AppError> {
    let id = parse_post_id(&id)?;
    let post = PostService::comment_post(state.posts.as_ref(), id, dto, &auth_user.0).await?;
    Ok(Json(post))
}
