use axum::{
    Router,
    routing::{MethodRouter, get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    comment_post, create_post, delete_post, get_post, get_posts, like_post, search_posts,
    update_post,
};

/// `GET`/`POST` on the post collection.
///
/// Mounted at `/posts` through the nested router and again at `/posts/`,
/// which a nested `/` route does not match.
pub fn posts_collection_route() -> MethodRouter<AppState> {
    get(get_posts).post(create_post)
}

pub fn init_posts_router() -> Router<AppState> {
    Router::new()
        .route("/", posts_collection_route())
        .route("/search", get(search_posts))
        .route(
            "/{id}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/{id}/likePost", patch(like_post))
        .route("/{id}/commentPost", post(comment_post))
}
