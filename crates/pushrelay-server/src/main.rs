use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use pushrelay_api::build_router;
use pushrelay_api::config::Settings;
use pushrelay_api::state::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pushrelay=debug,tower_http=debug".into()),
        )
        .init();

    let settings = Settings::from_env()?;
    let state: AppState = Arc::new(AppStateInner::from_settings(&settings)?);

    if let Err(e) = settings.firebase.resolve() {
        warn!("{}; sends will fail until it is set", e);
    }

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    info!("pushrelay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
