use anyhow::Context;
use trivia_api::{build_router, logging, AppConfig, AppState, DatabaseService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    logging::init(config.log_level).context("Failed to initialize logging")?;

    // 初始化数据库
    let db = if config.in_memory() {
        DatabaseService::open_in_memory()
    } else {
        DatabaseService::open(&config.database_path)
    }
    .context("Failed to initialize database")?;

    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!("Server running on: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
