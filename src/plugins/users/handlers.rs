use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::collections::HashMap;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::auth::PasswordHasher;
use crate::plugins::shared::{parse_id, AppJson};
use crate::plugins::users::models::{BlogSummary, CreateUser, NewUser, User, UserDto};
use crate::rules::{self, Rejection};
use crate::store::DynStore;

fn to_dto(user: User, blogs: &HashMap<Uuid, BlogSummary>) -> UserDto {
    UserDto {
        id: user.id,
        username: user.username,
        name: user.name,
        blogs: user.blogs.iter().filter_map(|id| blogs.get(id).cloned()).collect(),
    }
}

async fn blog_summaries(store: &DynStore) -> Result<HashMap<Uuid, BlogSummary>, AppError> {
    let blogs = store.list_blogs().await?;
    Ok(blogs
        .into_iter()
        .map(|b| (b.id, BlogSummary { id: b.id, title: b.title, author: b.author, url: b.url }))
        .collect())
}

pub async fn create_user(
    Extension(store): Extension<DynStore>,
    Extension(hasher): Extension<PasswordHasher>,
    AppJson(payload): AppJson<CreateUser>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    let signup = rules::new_user(payload)?;
    let existing = store.find_user_by_username(&signup.username).await?;
    rules::ensure_username_free(existing.as_ref())?;

    let password_hash = hasher.hash(&signup.password).map_err(AppError::internal)?;
    // the store's unique constraint still applies if another signup raced us
    let saved = store
        .insert_user(NewUser { username: signup.username, name: signup.name, password_hash })
        .await?;

    tracing::info!("user {} created", saved.username);
    Ok((StatusCode::CREATED, Json(to_dto(saved, &HashMap::new()))))
}

pub async fn list_users(Extension(store): Extension<DynStore>) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = store.list_users().await?;
    let blogs = blog_summaries(&store).await?;
    Ok(Json(users.into_iter().map(|u| to_dto(u, &blogs)).collect()))
}

pub async fn get_user(Extension(store): Extension<DynStore>, Path(id): Path<String>) -> Result<Json<UserDto>, AppError> {
    let id = parse_id(&id)?;
    let user = store
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::new(StatusCode::NOT_FOUND, Rejection::UserNotFound.to_string()).with_code("not_found"))?;
    let blogs = blog_summaries(&store).await?;
    Ok(Json(to_dto(user, &blogs)))
}
