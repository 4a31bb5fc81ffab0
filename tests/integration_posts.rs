mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::http::StatusCode;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::{Value, json};

use memories::router::init_router;
use memories_db::{MemoryPostRepository, PostRepository, Repositories};
use memories_models::{CreatePostDto, Post, PostChanges, PostId, PostSearch};

use common::{
    FEDERATED_ISSUER, FEDERATED_SECRET, request, send, setup_test_app, test_state, token_for,
};

fn post_body(title: &str, tags: &[&str]) -> Value {
    json!({
        "title": title,
        "message": "A day to remember",
        "tags": tags,
        "selectedFile": "data:image/png;base64,iVBORw0KGgo="
    })
}

async fn create_post(app: &axum::Router, token: &str, title: &str, tags: &[&str]) -> Value {
    let (status, body) = send(
        app,
        request("POST", "/posts", Some(token), Some(post_body(title, tags))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    body
}

/// Counts every store call made through it.
struct CountingPostRepository {
    inner: MemoryPostRepository,
    calls: AtomicUsize,
}

impl CountingPostRepository {
    fn new() -> Self {
        Self {
            inner: MemoryPostRepository::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostRepository for CountingPostRepository {
    async fn count(&self) -> anyhow::Result<i64> {
        self.hit();
        self.inner.count().await
    }

    async fn list_page(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<Post>> {
        self.hit();
        self.inner.list_page(limit, offset).await
    }

    async fn search(&self, search: &PostSearch) -> anyhow::Result<Vec<Post>> {
        self.hit();
        self.inner.search(search).await
    }

    async fn find_by_id(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn insert(&self, post: &Post) -> anyhow::Result<Post> {
        self.hit();
        self.inner.insert(post).await
    }

    async fn update(&self, id: PostId, changes: &PostChanges) -> anyhow::Result<Option<Post>> {
        self.hit();
        self.inner.update(id, changes).await
    }

    async fn delete(&self, id: PostId) -> anyhow::Result<bool> {
        self.hit();
        self.inner.delete(id).await
    }

    async fn toggle_like(&self, id: PostId, user_id: &str) -> anyhow::Result<Option<Post>> {
        self.hit();
        self.inner.toggle_like(id, user_id).await
    }

    async fn append_comment(&self, id: PostId, comment: &str) -> anyhow::Result<Option<Post>> {
        self.hit();
        self.inner.append_comment(id, comment).await
    }
}

#[tokio::test]
async fn test_list_posts_paginates_newest_first() {
    let (app, state) = setup_test_app();
    for i in 0..8 {
        let post = Post::create(
            CreatePostDto {
                title: format!("post {}", i),
                message: String::new(),
                tags: vec![],
                selected_file: None,
                name: None,
            },
            "author",
            Some("Author"),
        );
        state.posts.insert(&post).await.unwrap();
    }

    let (status, body) = send(&app, request("GET", "/posts", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["numberOfPages"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"][0]["title"], "post 7");

    let (_, body) = send(&app, request("GET", "/posts?page=2", None, None)).await;
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["post 1", "post 0"]);
}

#[tokio::test]
async fn test_list_posts_clamps_page_below_one() {
    let (app, _) = setup_test_app();

    let (status, body) = send(&app, request("GET", "/posts?page=0", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["numberOfPages"], 0);
}

#[tokio::test]
async fn test_create_post_requires_authentication() {
    let (app, _) = setup_test_app();

    let (status, body) = send(
        &app,
        request("POST", "/posts", None, Some(post_body("Sunset", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_create_post_uses_token_identity() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada Lovelace");

    let mut body = post_body("Sunset", &["beach", " beach ", ""]);
    body["creator"] = json!("someone-else");
    let (status, post) = send(&app, request("POST", "/posts", Some(&token), Some(body))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post["creator"], "user-1");
    assert_eq!(post["name"], "Ada Lovelace");
    assert_eq!(post["tags"], json!(["beach"]));
    assert_eq!(post["likes"], json!([]));
    assert_eq!(post["comments"], json!([]));
    assert!(post["_id"].is_string());
    assert!(post["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_post_validation_and_malformed_json() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");

    let (status, _) = send(
        &app,
        request("POST", "/posts", Some(&token), Some(post_body("", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        request("POST", "/posts", Some(&token), Some(json!({ "message": "no title" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "title is required");
}

#[tokio::test]
async fn test_create_post_with_trailing_slash() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");

    let (status, created) = send(
        &app,
        request("POST", "/posts/", Some(&token), Some(post_body("Sunset", &["beach"]))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", created);
    assert_eq!(created["creator"], "user-1");

    let (status, _) = send(
        &app,
        request("POST", "/posts/", None, Some(post_body("Anonymous", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, request("GET", "/posts/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Sunset");
}

#[tokio::test]
async fn test_blank_title_is_rejected() {
    let (app, state) = setup_test_app();
    let token = token_for("user-1", "Ada");

    let (status, _) = send(
        &app,
        request("POST", "/posts", Some(&token), Some(post_body("   ", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.posts.count().await.unwrap(), 0);

    let created = create_post(&app, &token, "Sunset", &[]).await;
    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/posts/{}", created["_id"].as_str().unwrap()),
            Some(&token),
            Some(json!({ "title": " \t " })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, fetched) = send(
        &app,
        request("GET", &format!("/posts/{}", created["_id"].as_str().unwrap()), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Sunset");
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let (app, _) = setup_test_app();

    let (status, body) = send(&app, request("GET", "/posts", Some("not-a-jwt"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let mut forged = common::test_jwt_config();
    forged.secret = "attacker-secret".to_string();
    let token = memories_auth::create_access_token("user-1", "a@b.co", "A", &forged).unwrap();
    let (status, _) = send(
        &app,
        request("POST", "/posts", Some(&token), Some(post_body("x", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_id_is_not_found_without_store_call() {
    let counting = Arc::new(CountingPostRepository::new());
    let mut repos = Repositories::in_memory();
    repos.posts = counting.clone();
    let app = init_router(test_state(repos));
    let token = token_for("user-1", "Ada");

    let (status, body) = send(
        &app,
        request(
            "PATCH",
            "/posts/not-an-id",
            Some(&token),
            Some(json!({ "title": "x" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No post with id: not-an-id");

    let (status, _) = send(&app, request("DELETE", "/posts/12345", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(counting.calls(), 0);
}

#[tokio::test]
async fn test_get_post_by_id() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    let created = create_post(&app, &token, "Sunset", &[]).await;
    let id = created["_id"].as_str().unwrap();

    let (status, post) = send(&app, request("GET", &format!("/posts/{}", id), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post, created);

    let unknown = PostId::new();
    let (status, _) = send(
        &app,
        request("GET", &format!("/posts/{}", unknown), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_post_partial_by_creator() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    let created = create_post(&app, &token, "Sunset", &["beach"]).await;
    let id = created["_id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        request(
            "PATCH",
            &format!("/posts/{}", id),
            Some(&token),
            Some(json!({ "title": "Sunrise" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Sunrise");
    assert_eq!(updated["message"], created["message"]);
    assert_eq!(updated["tags"], json!(["beach"]));
    assert_eq!(updated["creator"], "user-1");
}

#[tokio::test]
async fn test_non_creator_cannot_update_or_delete() {
    let (app, _) = setup_test_app();
    let owner = token_for("owner", "Owner");
    let intruder = token_for("intruder", "Intruder");
    let created = create_post(&app, &owner, "Mine", &[]).await;
    let uri = format!("/posts/{}", created["_id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        request("PATCH", &uri, Some(&intruder), Some(json!({ "title": "Theirs" }))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&intruder), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, post) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(post["title"], "Mine");
}

#[tokio::test]
async fn test_delete_post() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    let created = create_post(&app, &token, "Short-lived", &[]).await;
    let uri = format!("/posts/{}", created["_id"].as_str().unwrap());

    let (status, body) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Post deleted successfully");

    let (status, _) = send(&app, request("GET", &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", &uri, Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggles_twice_restores_likes() {
    let (app, _) = setup_test_app();
    let owner = token_for("owner", "Owner");
    let fan = token_for("fan", "Fan");
    let created = create_post(&app, &owner, "Likeable", &[]).await;
    let uri = format!("/posts/{}/likePost", created["_id"].as_str().unwrap());

    let (status, liked) = send(&app, request("PATCH", &uri, Some(&fan), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"], json!(["fan"]));

    let (status, unliked) = send(&app, request("PATCH", &uri, Some(&fan), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unliked["likes"], created["likes"]);
}

#[tokio::test]
async fn test_unauthenticated_like_does_not_mutate() {
    let (app, _) = setup_test_app();
    let owner = token_for("owner", "Owner");
    let created = create_post(&app, &owner, "Likeable", &[]).await;
    let id = created["_id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        request("PATCH", &format!("/posts/{}/likePost", id), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");

    let (_, post) = send(&app, request("GET", &format!("/posts/{}", id), None, None)).await;
    assert_eq!(post["likes"], json!([]));
}

#[tokio::test]
async fn test_like_unknown_post_is_not_found() {
    let (app, _) = setup_test_app();
    let token = token_for("fan", "Fan");

    let (status, _) = send(
        &app,
        request(
            "PATCH",
            &format!("/posts/{}/likePost", PostId::new()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_append_in_order() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    let created = create_post(&app, &token, "Chatty", &[]).await;
    let uri = format!("/posts/{}/commentPost", created["_id"].as_str().unwrap());

    for value in ["Ada: first", "Bob: second", "Cy: third"] {
        let (status, _) = send(
            &app,
            request("POST", &uri, Some(&token), Some(json!({ "value": value }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, post) = send(
        &app,
        request(
            "GET",
            &format!("/posts/{}", created["_id"].as_str().unwrap()),
            None,
            None,
        ),
    )
    .await;
    assert_eq!(
        post["comments"],
        json!(["Ada: first", "Bob: second", "Cy: third"])
    );
}

#[tokio::test]
async fn test_empty_comment_is_rejected() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    let created = create_post(&app, &token, "Chatty", &[]).await;
    let uri = format!("/posts/{}/commentPost", created["_id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        request("POST", &uri, Some(&token), Some(json!({ "value": "" }))),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_by_title_or_tags() {
    let (app, _) = setup_test_app();
    let token = token_for("user-1", "Ada");
    create_post(&app, &token, "Beach Day", &["summer"]).await;
    create_post(&app, &token, "Ski Trip", &["winter"]).await;
    create_post(&app, &token, "100% Museum", &["culture"]).await;

    let (status, body) = send(
        &app,
        request("GET", "/posts/search?searchQuery=BEACH", None, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "Beach Day");

    let (_, body) = send(
        &app,
        request("GET", "/posts/search?searchQuery=beach&tags=winter,culture", None, None),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, request("GET", "/posts/search?tags=wint", None, None)).await;
    assert_eq!(body["data"], json!([]));

    let (_, body) = send(&app, request("GET", "/posts/search", None, None)).await;
    assert_eq!(body["data"], json!([]));
}

#[derive(Serialize)]
struct ProviderClaims<'a> {
    sub: &'a str,
    name: &'a str,
    iss: &'a str,
    exp: usize,
}

fn federated_token(secret: &str) -> String {
    let claims = ProviderClaims {
        sub: "108000000000000000001",
        name: "Grace Hopper",
        iss: FEDERATED_ISSUER,
        exp: chrono::Utc::now().timestamp() as usize + 600,
    };
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some("provider-key-1".to_string());
    encode(&header, &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

#[tokio::test]
async fn test_federated_token_can_create_and_like() {
    let (app, _) = setup_test_app();
    let token = federated_token(FEDERATED_SECRET);

    let created = create_post(&app, &token, "From the provider", &[]).await;
    assert_eq!(created["creator"], "108000000000000000001");
    assert_eq!(created["name"], "Grace Hopper");

    let (status, liked) = send(
        &app,
        request(
            "PATCH",
            &format!("/posts/{}/likePost", created["_id"].as_str().unwrap()),
            Some(&token),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["likes"], json!(["108000000000000000001"]));
}

#[tokio::test]
async fn test_forged_federated_token_is_rejected() {
    let (app, _) = setup_test_app();
    let token = federated_token("not-the-provider");

    let (status, _) = send(
        &app,
        request("POST", "/posts", Some(&token), Some(post_body("x", &[]))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
