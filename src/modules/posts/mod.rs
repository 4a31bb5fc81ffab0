pub mod controller;
pub mod router;
pub mod service;

pub use router::{init_posts_router, posts_collection_route};
pub use service::{POSTS_PAGE_SIZE, PostService};
