use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::collections::HashMap;
use uuid::Uuid;

use crate::http_error::AppError;
use crate::plugins::auth::Identity;
use crate::plugins::blogs::models::{Blog, BlogCreate, BlogStats, BlogUpdate, BlogView, OwnerSummary};
use crate::plugins::shared::{parse_id, AppJson};
use crate::rules::{self, Rejection};
use crate::stats;
use crate::store::DynStore;

pub async fn list_blogs(Extension(store): Extension<DynStore>) -> Result<Json<Vec<BlogView>>, AppError> {
    let blogs = store.list_blogs().await?;
    let owners: HashMap<Uuid, OwnerSummary> = store
        .list_users()
        .await?
        .into_iter()
        .map(|u| (u.id, OwnerSummary { id: u.id, username: u.username, name: u.name }))
        .collect();

    let views = blogs
        .into_iter()
        .map(|blog| {
            let owner = blog.user.and_then(|id| owners.get(&id).cloned());
            BlogView::new(blog, owner)
        })
        .collect();
    Ok(Json(views))
}

pub async fn get_blog(Extension(store): Extension<DynStore>, Path(id): Path<String>) -> Result<Json<Blog>, AppError> {
    let id = parse_id(&id)?;
    let blog = store.find_blog(id).await?.ok_or(Rejection::NotFound)?;
    Ok(Json(blog))
}

pub async fn blog_stats(Extension(store): Extension<DynStore>) -> Result<Json<BlogStats>, AppError> {
    let blogs = store.list_blogs().await?;
    let all = Some(blogs.as_slice());
    Ok(Json(BlogStats {
        total_likes: stats::total_likes(&blogs),
        favorite_blog: stats::favorite_blog(all).cloned(),
        most_blogs: stats::most_blogs(all),
        most_likes: stats::most_likes(all),
    }))
}

pub async fn create_blog(
    Extension(store): Extension<DynStore>,
    identity: Identity,
    AppJson(payload): AppJson<BlogCreate>,
) -> Result<(StatusCode, Json<Blog>), AppError> {
    // a validly signed token may outlive its user
    let identity = match identity.0 {
        Some(id) if store.find_user(id).await?.is_some() => Some(id),
        _ => None,
    };
    let new_blog = rules::new_blog(identity, payload)?;
    let owner = new_blog.user;

    let saved = store.insert_blog(new_blog).await?;
    store.push_blog_ref(owner, saved.id).await?;

    tracing::info!("blog {} created by {}", saved.id, owner);
    Ok((StatusCode::CREATED, Json(saved)))
}

// No ownership check here, unlike delete.
pub async fn update_blog(
    Extension(store): Extension<DynStore>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<BlogUpdate>,
) -> Result<Json<Blog>, AppError> {
    let id = parse_id(&id)?;
    let patch = rules::blog_patch(payload)?;
    let updated = store.update_blog(id, patch).await?.ok_or(Rejection::NotFound)?;
    Ok(Json(updated))
}

pub async fn delete_blog(
    Extension(store): Extension<DynStore>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    let blog = store.find_blog(id).await?;
    let owner = rules::authorize_delete(blog.as_ref(), identity.0)?;

    // a concurrent delete may have won the race
    store.delete_blog(id).await?.ok_or(Rejection::NotFound)?;
    store.pull_blog_ref(owner, id).await?;

    tracing::info!("blog {} deleted by {}", id, owner);
    Ok(StatusCode::NO_CONTENT)
}
