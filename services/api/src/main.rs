use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use study_ai::build_backend;
use study_api::logging::init_logging;
use study_api::{router, AppConfig, AppState};
use study_storage::{db::init_db, Storage};

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    warn!("🛑 Ctrl+C received! Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A. 加载配置与日志
    dotenv().ok();
    let _log_guard = init_logging(); // _guard 不能丢

    info!("Starting Study API ⚡️");

    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate()?;

    // B. 初始化存储层
    let storage = match &config.database.url {
        Some(url) => {
            let pool = init_db(url, &config.database.pool_settings()).await?;
            Storage::mysql(pool)
        }
        None => {
            warn!("DATABASE_URL is not set, using in-memory storage. Data will not survive a restart.");
            Storage::in_memory()
        }
    };
    info!("📦 Storage module initialized.");

    // C. 初始化模型后端 (依赖注入，不走全局)
    let backend = build_backend(&config.llm)?;

    // D. 启动 HTTP 服务
    let state = AppState::from_config(&config, backend, storage);
    let app = router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!("🚀 Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failure")?;

    info!("👋 Study API Shutdown Complete.");
    Ok(())
}
