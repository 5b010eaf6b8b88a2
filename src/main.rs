use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use tablepick_api::{
    config::Config,
    routes::{create_router, AppState},
    store::{DirectoryStore, MemoryStore, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn DirectoryStore> = match &config.database_url {
        Some(url) => {
            tracing::info!("Using the Postgres directory store");
            Arc::new(PgStore::connect(url).await?)
        }
        None => {
            tracing::info!("No DATABASE_URL configured, using the in-memory directory store");
            Arc::new(MemoryStore::seeded())
        }
    };

    let app = create_router(AppState { store });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
