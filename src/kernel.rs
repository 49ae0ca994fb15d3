use async_trait::async_trait;
use axum::http::StatusCode;
use axum::{Extension, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::plugins::auth::TokenAuthority;

#[async_trait]
pub trait Plugin: Send + Sync {
    async fn router(&self) -> Router;

    fn name(&self) -> &'static str;

    /// Where the plugin is mounted. Defaults to `/api/{name}`.
    fn mount_path(&self) -> String {
        format!("/api/{}", self.name())
    }

    /// Optional lifecycle hook called when the kernel starts.
    async fn on_start(&self) {}
    /// Optional lifecycle hook called on shutdown.
    async fn on_shutdown(&self) {}
}

async fn unknown_endpoint() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "unknown endpoint" })))
}

/// Builds the application router by mounting each plugin at its mount path.
///
/// The token authority is installed for every route so that any handler can
/// resolve the caller's identity.
pub async fn build_app(plugins: &[Box<dyn Plugin>], tokens: Arc<TokenAuthority>) -> Router {
    let mut app = Router::new();

    for plugin in plugins.iter() {
        info!("starting plugin {}", plugin.name());
        plugin.on_start().await;
        let router = plugin.router().await;
        app = app.nest(&plugin.mount_path(), router);
    }

    app.fallback(unknown_endpoint).layer(Extension(tokens))
}
