//! Post models and DTOs.
//!
//! # Core Types
//!
//! - [`Post`] - A stored post, as returned by every post endpoint
//! - [`PostSearch`] - Normalized search criteria shared by all store backends
//!
//! # Request DTOs
//!
//! - [`CreatePostDto`] - Body of `POST /posts`
//! - [`UpdatePostDto`] - Body of `PATCH /posts/{id}` (partial)
//! - [`CommentDto`] - Body of `POST /posts/{id}/commentPost`
//! - [`SearchParams`] - Query of `GET /posts/search`

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use memories_core::serde::{
    deserialize_optional_trimmed_string, deserialize_trimmed_string, normalize_list,
    split_comma_list,
};

use crate::ids::PostId;

/// A user-authored post.
///
/// `likes` is a set of user ids; a user either likes a post or does not.
/// `comments` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: PostId,
    pub title: String,
    pub message: String,
    /// Display name of the author
    pub name: String,
    /// User id of the author
    pub creator: String,
    pub tags: Vec<String>,
    /// Embedded image, usually a base64 data URL
    pub selected_file: String,
    pub likes: BTreeSet<String>,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Builds a new post authored by `creator`, stamped with the current time.
    pub fn create(dto: CreatePostDto, creator: &str, author_name: Option<&str>) -> Self {
        let name = author_name
            .map(str::to_string)
            .or(dto.name)
            .unwrap_or_default();

        Self {
            id: PostId::new(),
            title: dto.title.trim().to_string(),
            message: dto.message,
            name,
            creator: creator.to_string(),
            tags: normalize_list(dto.tags),
            selected_file: dto.selected_file.unwrap_or_default(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.contains(user_id)
    }

    pub fn is_created_by(&self, user_id: &str) -> bool {
        self.creator == user_id
    }

    /// Adds `user_id` to the likes if absent, removes it otherwise.
    ///
    /// Returns `true` when the post is liked after the toggle.
    pub fn toggle_like(&mut self, user_id: &str) -> bool {
        if self.likes.remove(user_id) {
            false
        } else {
            self.likes.insert(user_id.to_string());
            true
        }
    }
}

/// Ordering used for every listing: newest first, ties broken by id.
pub fn newest_first(a: &Post, b: &Post) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostDto {
    #[serde(deserialize_with = "deserialize_trimmed_string")]
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 10000, message = "Message must be at most 10000 characters"))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "A post can have at most 20 tags"))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub selected_file: Option<String>,
    /// Display name, used when the token does not carry one
    #[serde(default)]
    pub name: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed_string")]
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 10000, message = "Message must be at most 10000 characters"))]
    pub message: Option<String>,
    #[validate(length(max = 20, message = "A post can have at most 20 tags"))]
    pub tags: Option<Vec<String>>,
    pub selected_file: Option<String>,
}

/// Normalized form of an [`UpdatePostDto`] handed to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub message: Option<String>,
    pub tags: Option<Vec<String>>,
    pub selected_file: Option<String>,
}

impl From<UpdatePostDto> for PostChanges {
    fn from(dto: UpdatePostDto) -> Self {
        Self {
            title: dto.title.map(|t| t.trim().to_string()),
            message: dto.message,
            tags: dto.tags.map(normalize_list),
            selected_file: dto.selected_file,
        }
    }
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.message.is_none()
            && self.tags.is_none()
            && self.selected_file.is_none()
    }

    pub fn apply(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(message) = &self.message {
            post.message = message.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = tags.clone();
        }
        if let Some(selected_file) = &self.selected_file {
            post.selected_file = selected_file.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CommentDto {
    #[validate(length(min = 1, max = 2000, message = "Comment must be between 1 and 2000 characters"))]
    pub value: String,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of the title
    pub search_query: Option<String>,
    /// Comma-separated list of tags
    pub tags: Option<String>,
}

/// Search criteria: title substring OR any of the tags.
///
/// An empty criterion matches nothing, so an empty search matches no post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostSearch {
    pub title: Option<String>,
    pub tags: Vec<String>,
}

impl From<SearchParams> for PostSearch {
    fn from(params: SearchParams) -> Self {
        Self {
            title: params
                .search_query
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
            tags: params
                .tags
                .as_deref()
                .map(split_comma_list)
                .unwrap_or_default(),
        }
    }
}

impl PostSearch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.tags.is_empty()
    }

    pub fn matches(&self, post: &Post) -> bool {
        let title_match = self.title.as_ref().is_some_and(|query| {
            post.title.to_lowercase().contains(&query.to_lowercase())
        });

        title_match || post.tags.iter().any(|tag| self.tags.contains(tag))
    }

    /// The title criterion as an escaped `ILIKE` pattern.
    pub fn title_pattern(&self) -> Option<String> {
        self.title.as_ref().map(|query| {
            let mut escaped = String::with_capacity(query.len() + 2);
            escaped.push('%');
            for ch in query.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            escaped.push('%');
            escaped
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedPostsResponse {
    pub data: Vec<Post>,
    pub current_page: i64,
    pub number_of_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchPostsResponse {
    pub data: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(title: &str, tags: &[&str]) -> CreatePostDto {
        CreatePostDto {
            title: title.to_string(),
            message: "a day at the beach".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            selected_file: None,
            name: Some("Body Name".to_string()),
        }
    }

    #[test]
    fn test_create_uses_creator_and_token_name() {
        let post = Post::create(dto("  Sunset ", &[" beach", "beach", ""]), "user-1", Some("Ada"));
        assert_eq!(post.title, "Sunset");
        assert_eq!(post.creator, "user-1");
        assert_eq!(post.name, "Ada");
        assert_eq!(post.tags, vec!["beach".to_string()]);
        assert!(post.likes.is_empty());
        assert!(post.comments.is_empty());
        assert_eq!(post.selected_file, "");
    }

    #[test]
    fn test_create_falls_back_to_body_name() {
        let post = Post::create(dto("Sunset", &[]), "user-1", None);
        assert_eq!(post.name, "Body Name");
    }

    #[test]
    fn test_toggle_like_twice_restores() {
        let mut post = Post::create(dto("Sunset", &[]), "user-1", None);
        post.likes.insert("someone".to_string());
        let before = post.likes.clone();

        assert!(post.toggle_like("user-2"));
        assert!(post.is_liked_by("user-2"));
        assert!(!post.toggle_like("user-2"));
        assert_eq!(post.likes, before);
    }

    #[test]
    fn test_search_title_case_insensitive() {
        let post = Post::create(dto("Sunset at Malibu", &["travel"]), "u", None);
        let search = PostSearch::from(SearchParams {
            search_query: Some("MALIBU".to_string()),
            tags: None,
        });
        assert!(search.matches(&post));
    }

    #[test]
    fn test_search_tag_exact_membership() {
        let post = Post::create(dto("Sunset", &["travel"]), "u", None);
        let exact = PostSearch::from(SearchParams {
            search_query: None,
            tags: Some("food, travel".to_string()),
        });
        let partial = PostSearch::from(SearchParams {
            search_query: None,
            tags: Some("trav".to_string()),
        });
        assert!(exact.matches(&post));
        assert!(!partial.matches(&post));
    }

    #[test]
    fn test_empty_search_matches_nothing() {
        let post = Post::create(dto("Sunset", &["travel"]), "u", None);
        let search = PostSearch::from(SearchParams {
            search_query: Some("   ".to_string()),
            tags: Some(",".to_string()),
        });
        assert!(search.is_empty());
        assert!(!search.matches(&post));
    }

    #[test]
    fn test_title_pattern_escapes_wildcards() {
        let search = PostSearch {
            title: Some("100%_done\\".to_string()),
            tags: vec![],
        };
        assert_eq!(search.title_pattern().unwrap(), "%100\\%\\_done\\\\%");
    }

    #[test]
    fn test_changes_apply_only_present_fields() {
        let mut post = Post::create(dto("Sunset", &["travel"]), "u", None);
        let changes = PostChanges::from(UpdatePostDto {
            title: Some(" Sunrise ".to_string()),
            tags: Some(vec!["a".to_string(), " a ".to_string(), "b".to_string()]),
            ..Default::default()
        });
        changes.apply(&mut post);
        assert_eq!(post.title, "Sunrise");
        assert_eq!(post.message, "a day at the beach");
        assert_eq!(post.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_blank_title_fails_validation() {
        let create: CreatePostDto = serde_json::from_str(r#"{"title":"   "}"#).unwrap();
        assert_eq!(create.title, "");
        assert!(create.validate().is_err());

        let update: UpdatePostDto = serde_json::from_str(r#"{"title":"\t "}"#).unwrap();
        assert!(update.validate().is_err());

        let update: UpdatePostDto = serde_json::from_str(r#"{"message":"only"}"#).unwrap();
        assert!(update.title.is_none());
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_post_wire_format() {
        let post = Post::create(dto("Sunset", &[]), "u", None);
        let json = serde_json::to_value(&post).unwrap();
        assert!(json.get("_id").is_some());
        assert!(json.get("selectedFile").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["likes"].is_array());
    }

    #[test]
    fn test_newest_first_ordering() {
        let older = Post::create(dto("old", &[]), "u", None);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let newer = Post::create(dto("new", &[]), "u", None);
        let mut posts = vec![older.clone(), newer.clone()];
        posts.sort_by(newest_first);
        assert_eq!(posts[0].id, newer.id);
    }
}
