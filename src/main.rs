use std::sync::Arc;

use tokio::sync::broadcast;

use fheap::api::router::create_router;
use fheap::api::ws_types::WsMessage;
use fheap::config::AppConfig;
use fheap::fhe::FheCipher;
use fheap::services::{MonitorStatus, PriceMonitor};
use fheap::{db, metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = metrics::init_metrics()?;
    let cipher = FheCipher::new(&config.fhe_key)?;

    tracing::info!("Connecting to store...");
    let store = db::connect(config.database_url.as_deref(), config.memory_store_max_rows).await?;
    tracing::info!(backend = store.backend(), "Store connected");

    // --- WebSocket broadcast channel for the live feed ---
    let (ws_tx, _) = broadcast::channel::<WsMessage>(256);
    let monitor_status = Arc::new(MonitorStatus::new());

    // --- Background price monitor ---
    if config.monitor_enabled {
        let monitor = PriceMonitor::new(
            Arc::clone(&store),
            cipher.clone(),
            config.monitor_config(),
            Arc::clone(&monitor_status),
            ws_tx.clone(),
        );
        tokio::spawn(monitor.run());
        tracing::info!(pools = config.pools.len(), "Price monitor spawned");
    } else {
        tracing::info!("Price monitor disabled (MONITOR_ENABLED=false)");
    }

    let state = AppState {
        store: Arc::clone(&store),
        config,
        cipher,
        ws_tx,
        metrics_handle,
        monitor: monitor_status,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
