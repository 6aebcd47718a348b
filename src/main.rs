use std::sync::Arc;

use nowplaying::{AppState, Config, MemoryStorage};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("nowplaying=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let templates = tera::Tera::new("templates/**/*.html")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, MemoryStorage::new(), templates));
    let app = nowplaying::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server is running on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
