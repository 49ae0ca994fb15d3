use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{Extension, Json};
use std::sync::Arc;

use crate::http_error::AppError;
use crate::plugins::auth::models::{LoginRequest, LoginResponse};
use crate::plugins::auth::password::PasswordHasher;
use crate::plugins::auth::token::TokenAuthority;
use crate::plugins::shared::AppJson;
use crate::store::DynStore;

/// The caller's user id, if the request carried a valid bearer token.
///
/// Never rejects on a bad token: handlers decide what a missing identity
/// means for their operation.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Option<uuid::Uuid>);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = parts
            .extensions
            .get::<Arc<TokenAuthority>>()
            .cloned()
            .ok_or_else(|| AppError::internal("token authority not installed"))?;

        let user_id = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .and_then(|token| tokens.verify(token.trim()));

        Ok(Identity(user_id))
    }
}

fn invalid_credentials() -> AppError {
    AppError::new(StatusCode::UNAUTHORIZED, "invalid username or password").with_code("invalid_credentials")
}

pub async fn login(
    Extension(store): Extension<DynStore>,
    Extension(hasher): Extension<PasswordHasher>,
    Extension(tokens): Extension<Arc<TokenAuthority>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.username.is_empty() || payload.password.is_empty() {
        return Err(AppError::new(StatusCode::BAD_REQUEST, "username and password required").with_code("invalid_credentials"));
    }

    let user = store.find_user_by_username(&payload.username).await?.ok_or_else(invalid_credentials)?;
    if !hasher.verify(&payload.password, &user.password_hash) {
        tracing::info!("failed login for {}", payload.username);
        return Err(invalid_credentials());
    }

    let token = tokens.issue(user.id, &user.username).map_err(AppError::internal)?;
    Ok(Json(LoginResponse { token, username: user.username, name: user.name }))
}
