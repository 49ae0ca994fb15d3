use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::plugins::blogs::models::{Blog, BlogPatch, NewBlog};
use crate::plugins::users::models::{NewUser, User};

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{DbPool, PgStore};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the offending field.
    #[error("duplicate value for `{0}`")]
    Duplicate(String),
    /// A required field was absent.
    #[error("`{0}` is required")]
    MissingField(String),
    /// A reference points at a record that does not exist.
    #[error("unknown `{0}`")]
    UnknownReference(String),
    #[error("storage error: {0}")]
    Backend(String),
}

/// Persistence for blogs and users.
///
/// Implementations enforce username uniqueness and the required blog fields
/// (`title`, `url`) themselves; callers may pre-check but cannot rely on it.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError>;
    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError>;
    /// Returns `None` when no blog has this id.
    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, StoreError>;
    /// Returns the removed blog, or `None` when it was already gone.
    async fn delete_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Adds `blog_id` to the user's blog set. Unknown users are ignored.
    async fn push_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError>;
    async fn pull_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError>;
}

pub type DynStore = Arc<dyn Store>;
