use axum::{routing::get, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::auth::PasswordHasher;
use crate::plugins::users::handlers::{create_user, get_user, list_users};
use crate::store::DynStore;

pub struct UsersPlugin {
    store: DynStore,
    hasher: PasswordHasher,
}

impl UsersPlugin {
    pub fn new(store: DynStore, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }
}

#[async_trait::async_trait]
impl Plugin for UsersPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(list_users).post(create_user))
            .route("/:id", get(get_user))
            .layer(Extension(self.store.clone()))
            .layer(Extension(self.hasher))
    }

    fn name(&self) -> &'static str {
        "users"
    }
}
