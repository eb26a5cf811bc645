use anyhow::Result;
use clap::Parser;
use movies_api::backend::{create_router, initialize_backend, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    let config = Config::parse();
    let app_state = initialize_backend(&config).await?;
    let app = create_router(app_state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, env = %config.environment, "starting server");

    axum::serve(listener, app).await?;
    Ok(())
}
