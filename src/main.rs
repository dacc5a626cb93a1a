use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};
use zenith_habits::{AppState, Config, FileStore, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    tokio::fs::create_dir_all(&config.data_dir).await?;
    info!(data_dir = %config.data_dir.display(), seed_defaults = config.seed_defaults, "loaded config");

    let state = AppState::new(FileStore::new(&config.data_dir), config.seed_defaults);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
