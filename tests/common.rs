use bloglist_api::kernel::{build_app, Plugin};
use bloglist_api::plugins::auth::{LoginPlugin, PasswordHasher, TokenAuthority};
use bloglist_api::plugins::blogs::BlogsPlugin;
use bloglist_api::plugins::health::HealthPlugin;
use bloglist_api::plugins::users::UsersPlugin;
use bloglist_api::store::{DynStore, InMemoryStore};
use std::sync::Arc;
use tokio::net::TcpListener;

pub const JWT_SECRET_CONST: &str = "bloglist-test-secret";

pub fn default_plugins(store: DynStore) -> Vec<Box<dyn Plugin>> {
    let hasher = PasswordHasher::new(4);
    vec![
        Box::new(HealthPlugin),
        Box::new(BlogsPlugin::new(store.clone())),
        Box::new(UsersPlugin::new(store.clone(), hasher)),
        Box::new(LoginPlugin::new(store, hasher)),
    ]
}

pub async fn spawn_app_with_plugins(plugins: Vec<Box<dyn Plugin>>) -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let tokens = Arc::new(TokenAuthority::new(JWT_SECRET_CONST, chrono::Duration::hours(1)));
    let app = build_app(&plugins, tokens).await;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{}", addr), server_handle))
}

/// Spawns the full app over a fresh in-memory store.
pub async fn spawn_in_memory() -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    spawn_app_with_plugins(default_plugins(InMemoryStore::new().into_arc())).await
}
