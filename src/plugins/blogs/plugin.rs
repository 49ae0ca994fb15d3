use axum::{routing::get, Extension, Router};

use crate::kernel::Plugin;
use crate::plugins::blogs::handlers::*;
use crate::store::DynStore;

pub struct BlogsPlugin {
    store: DynStore,
}

impl BlogsPlugin {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Plugin for BlogsPlugin {
    async fn router(&self) -> Router {
        Router::new()
            .route("/", get(list_blogs).post(create_blog))
            .route("/stats", get(blog_stats))
            .route("/:id", get(get_blog).put(update_blog).delete(delete_blog))
            .layer(Extension(self.store.clone()))
    }

    fn name(&self) -> &'static str {
        "blogs"
    }
}
