use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

use super::{DynStore, Store, StoreError};
use crate::plugins::blogs::models::{Blog, BlogPatch, NewBlog};
use crate::plugins::users::models::{NewUser, User};

#[derive(Default)]
struct Tables {
    // Vecs keep insertion order, which the list endpoints and stats rely on.
    blogs: Vec<Blog>,
    users: Vec<User>,
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> DynStore {
        Arc::new(self)
    }

    /// Inserts a fully formed blog, bypassing validation and ownership.
    pub fn seed_blog(&self, blog: Blog) {
        self.inner.lock().blogs.push(blog);
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        Ok(self.inner.lock().blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.inner.lock().blogs.clone())
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        if blog.title.is_empty() {
            return Err(StoreError::MissingField("title".into()));
        }
        let url = blog.url.ok_or_else(|| StoreError::MissingField("url".into()))?;
        let mut tables = self.inner.lock();
        if !tables.users.iter().any(|u| u.id == blog.user) {
            return Err(StoreError::UnknownReference("user".into()));
        }
        let saved = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            author: blog.author,
            url,
            likes: blog.likes,
            user: Some(blog.user),
        };
        tables.blogs.push(saved.clone());
        Ok(saved)
    }

    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, StoreError> {
        let mut tables = self.inner.lock();
        let Some(blog) = tables.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        patch.apply(blog);
        Ok(Some(blog.clone()))
    }

    async fn delete_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let mut tables = self.inner.lock();
        let Some(idx) = tables.blogs.iter().position(|b| b.id == id) else {
            return Ok(None);
        };
        Ok(Some(tables.blogs.remove(idx)))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().users.iter().find(|u| u.username == username).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.lock().users.clone())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.inner.lock();
        // checked under the same lock as the push, so this is authoritative
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username".into()));
        }
        let saved = User {
            id: Uuid::new_v4(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
            blogs: Vec::new(),
        };
        tables.users.push(saved.clone());
        Ok(saved)
    }

    async fn push_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.inner.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            if !user.blogs.contains(&blog_id) {
                user.blogs.push(blog_id);
            }
        }
        Ok(())
    }

    async fn pull_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.inner.lock();
        if let Some(user) = tables.users.iter_mut().find(|u| u.id == user_id) {
            user.blogs.retain(|id| *id != blog_id);
        }
        Ok(())
    }
}
