use bloglist_api::config::AppConfig;
use bloglist_api::kernel::{build_app, Plugin};
use bloglist_api::plugins::auth::{LoginPlugin, PasswordHasher, TokenAuthority};
use bloglist_api::plugins::blogs::BlogsPlugin;
use bloglist_api::plugins::health::HealthPlugin;
use bloglist_api::plugins::users::UsersPlugin;
use bloglist_api::store::{DynStore, InMemoryStore, PgStore};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let store: DynStore = match &config.database_url {
        Some(url) => PgStore::connect(url).await?.into_arc(),
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            InMemoryStore::new().into_arc()
        }
    };
    let hasher = PasswordHasher::new(config.bcrypt_cost);
    let tokens = Arc::new(TokenAuthority::new(
        &config.jwt_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    ));

    let plugins_vec: Vec<Box<dyn Plugin>> = vec![
        Box::new(HealthPlugin),
        Box::new(BlogsPlugin::new(store.clone())),
        Box::new(UsersPlugin::new(store.clone(), hasher)),
        Box::new(LoginPlugin::new(store.clone(), hasher)),
    ];

    let plugin_names: Vec<&'static str> = plugins_vec.iter().map(|p| p.name()).collect();
    tracing::info!("mounting plugins: {:?}", plugin_names);

    let app = build_app(&plugins_vec, tokens).await;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            for p in plugins_vec.iter() {
                p.on_shutdown().await;
            }
        })
        .await?;

    Ok(())
}
