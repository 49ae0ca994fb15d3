use async_trait::async_trait;
use sqlx::postgres::{PgDatabaseError, PgRow};
use sqlx::Row;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{DynStore, Store, StoreError};
use crate::plugins::blogs::models::{Blog, BlogPatch, NewBlog};
use crate::plugins::users::models::{NewUser, User};

const BLOG_COLUMNS: &str = "id, title, author, url, likes, user_id";
const USER_COLUMNS: &str = "id, username, name, password_hash";

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    let field = match db.constraint() {
                        Some(cons) if cons.contains("username") => "username",
                        _ => "key",
                    };
                    return StoreError::Duplicate(field.to_string());
                }
                // not_null_violation
                Some("23502") => {
                    let column = db
                        .try_downcast_ref::<PgDatabaseError>()
                        .and_then(|pg| pg.column())
                        .unwrap_or("unknown");
                    return StoreError::MissingField(column.to_string());
                }
                // foreign_key_violation; user_id is the only reference a write can break
                Some("23503") => return StoreError::UnknownReference("user".to_string()),
                // check_violation; the only checks are on blogs.title and blogs.likes
                Some("23514") => {
                    if let Some(cons) = db.constraint() {
                        if cons.contains("title") {
                            return StoreError::MissingField("title".to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        StoreError::Backend(e.to_string())
    }
}

pub type DbPool = sqlx::Pool<sqlx::Postgres>;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Connects to Postgres and applies the bundled migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn into_arc(self) -> DynStore {
        Arc::new(self)
    }

    async fn blog_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>, StoreError> {
        let ids = sqlx::query_scalar::<_, Uuid>("SELECT blog_id FROM user_blogs WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn with_blog_ids(&self, row: Option<PgRow>) -> Result<Option<User>, StoreError> {
        let Some(row) = row else { return Ok(None) };
        let mut user = user_from_row(&row)?;
        user.blogs = self.blog_ids(user.id).await?;
        Ok(Some(user))
    }
}

fn blog_from_row(row: &PgRow) -> Result<Blog, StoreError> {
    let likes: i64 = row.try_get("likes")?;
    Ok(Blog {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        url: row.try_get("url")?,
        likes: u32::try_from(likes).map_err(|_| StoreError::Backend(format!("likes out of range: {likes}")))?,
        user: row.try_get("user_id")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        name: row.try_get("name")?,
        password_hash: row.try_get("password_hash")?,
        blogs: Vec::new(),
    })
}

#[async_trait]
impl Store for PgStore {
    async fn find_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let row = sqlx::query(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(blog_from_row).transpose()
    }

    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at, id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(blog_from_row).collect()
    }

    async fn insert_blog(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO blogs (id, title, author, url, likes, user_id) VALUES ($1, $2, $3, $4, $5, $6) RETURNING {BLOG_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(i64::from(blog.likes))
        .bind(blog.user)
        .fetch_one(&self.pool)
        .await?;
        blog_from_row(&row)
    }

    async fn update_blog(&self, id: Uuid, patch: BlogPatch) -> Result<Option<Blog>, StoreError> {
        let row = sqlx::query(&format!(
            "UPDATE blogs SET title = COALESCE($1, title), author = COALESCE($2, author), url = COALESCE($3, url), likes = COALESCE($4, likes) WHERE id = $5 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(patch.title)
        .bind(patch.author)
        .bind(patch.url)
        .bind(patch.likes.map(i64::from))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(blog_from_row).transpose()
    }

    async fn delete_blog(&self, id: Uuid) -> Result<Option<Blog>, StoreError> {
        let row = sqlx::query(&format!("DELETE FROM blogs WHERE id = $1 RETURNING {BLOG_COLUMNS}"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(blog_from_row).transpose()
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        self.with_blog_ids(row).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        self.with_blog_ids(row).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"))
            .fetch_all(&self.pool)
            .await?;
        let refs = sqlx::query("SELECT user_id, blog_id FROM user_blogs")
            .fetch_all(&self.pool)
            .await?;

        let mut by_user: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for r in refs {
            by_user.entry(r.try_get("user_id")?).or_default().push(r.try_get("blog_id")?);
        }

        rows.iter()
            .map(|row| {
                let mut user = user_from_row(row)?;
                user.blogs = by_user.remove(&user.id).unwrap_or_default();
                Ok(user)
            })
            .collect()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO users (id, username, name, password_hash) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        user_from_row(&row)
    }

    async fn push_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_blogs (user_id, blog_id) SELECT $1, $2 WHERE EXISTS (SELECT 1 FROM users WHERE id = $1) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(blog_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn pull_blog_ref(&self, user_id: Uuid, blog_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM user_blogs WHERE user_id = $1 AND blog_id = $2")
            .bind(user_id)
            .bind(blog_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
