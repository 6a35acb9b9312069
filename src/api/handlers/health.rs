use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::services::MonitorSnapshot;
use crate::AppState;

const SERVICE_NAME: &str = "FHEAP Backend";
const STATUS_NOTE: &str =
    "This backend supports the FHEAP smart contracts. Main functionality is in the Solidity contracts.";

#[derive(Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub service: &'static str,
    pub status: &'static str,
    pub database: &'static str,
    pub store: &'static str,
    pub monitor_enabled: bool,
    pub monitor: MonitorSnapshot,
    pub timestamp: DateTime<Utc>,
    pub note: &'static str,
}

/// GET /api/health — liveness only; does not touch the store.
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "healthy",
        timestamp: Utc::now(),
        service: SERVICE_NAME,
    })
}

/// GET /api/status — store connectivity and monitor progress.
pub async fn status(State(state): State<AppState>) -> Json<ServiceStatus> {
    let database = match state.store.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::error!(error = %e, "Database connection error");
            "disconnected"
        }
    };

    Json(ServiceStatus {
        service: SERVICE_NAME,
        status: "running",
        database,
        store: state.store.backend(),
        monitor_enabled: state.config.monitor_enabled,
        monitor: state.monitor.snapshot(),
        timestamp: Utc::now(),
        note: STATUS_NOTE,
    })
}
