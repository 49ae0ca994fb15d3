use async_trait::async_trait;
use axum::{routing::post, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::auth::handlers;
use crate::plugins::auth::password::PasswordHasher;
use crate::store::DynStore;

/// Token issuance at `/api/login`.
pub struct LoginPlugin {
    store: DynStore,
    hasher: PasswordHasher,
}

impl LoginPlugin {
    pub fn new(store: DynStore, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }
}

#[async_trait]
impl Plugin for LoginPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", post(handlers::login))
            .layer(Extension(self.store.clone()))
            .layer(Extension(self.hasher))
    }

    fn name(&self) -> &'static str {
        "login"
    }
}
