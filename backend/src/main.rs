use anyhow::Result;
use moneymate_backend::{create_router, initialize_backend};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let db_url = std::env::var("MONEYMATE_DB").unwrap_or_else(|_| "sqlite:moneymate.db".to_string());
    let addr: SocketAddr = std::env::var("MONEYMATE_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()?;
    let media_dir = PathBuf::from(
        std::env::var("MONEYMATE_MEDIA_DIR").unwrap_or_else(|_| "media".to_string()),
    );

    let state = initialize_backend(&db_url, &media_dir).await?;
    let app = create_router(state, &media_dir);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
