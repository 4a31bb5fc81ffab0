use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use memories_models::{
    AuthResponse, CommentDto, CreatePostDto, MessageResponse, PaginatedPostsResponse, Post,
    PostId, SearchPostsResponse, SignInRequest, SignUpRequest, UpdatePostDto, User, UserId,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::posts::controller::get_posts,
        crate::modules::posts::controller::search_posts,
        crate::modules::posts::controller::get_post,
        crate::modules::posts::controller::create_post,
        crate::modules::posts::controller::update_post,
        crate::modules::posts::controller::delete_post,
        crate::modules::posts::controller::like_post,
        crate::modules::posts::controller::comment_post,
        crate::modules::users::controller::sign_in,
        crate::modules::users::controller::sign_up,
    ),
    components(
        schemas(
            Post,
            PostId,
            CreatePostDto,
            UpdatePostDto,
            CommentDto,
            PaginatedPostsResponse,
            SearchPostsResponse,
            MessageResponse,
            User,
            UserId,
            SignInRequest,
            SignUpRequest,
            AuthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Posts", description = "The memories feed: posts, likes and comments"),
        (name = "Users", description = "Sign-in and sign-up with credentials")
    ),
    info(
        title = "Memories API",
        version = "0.1.0",
        description = "A social memories feed built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
