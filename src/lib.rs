pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod execution;
pub mod fhe;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::api::ws_types::WsMessage;
use crate::config::AppConfig;
use crate::db::Store;
use crate::fhe::FheCipher;
use crate::services::MonitorStatus;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: AppConfig,
    pub cipher: FheCipher,
    pub ws_tx: broadcast::Sender<WsMessage>,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub monitor: Arc<MonitorStatus>,
}
