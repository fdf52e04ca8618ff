use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use vision_chat_core::app_state::build_app_state;
use vision_chat_core::core::config::AppConfig;
use vision_chat_core::core::logging::init_tracing;
use vision_chat_core::routes::app_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Failed to read configuration")?;
    let _log_guard = init_tracing(config.server.log_dir.as_deref());

    let relay = &config.relay;
    match relay.masked_api_key() {
        Some(key) => info!(
            upstream = %relay.completions_url(),
            model = %relay.model,
            api_key = %key,
            "upstream relay configured"
        ),
        None => warn!("OPENAI_API_KEY is not set; chat replies will use the canned fallback"),
    }

    let state = build_app_state(config.relay.clone()).context("Failed to build app state")?;
    let app = app_router(config.server.max_body_bytes).with_state(state);

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!("🚀 Listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
