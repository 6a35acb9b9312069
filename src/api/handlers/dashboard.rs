use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::StoreCounts;
use crate::errors::AppError;
use crate::fhe::Ciphertext;
use crate::models::{ArbitrageOpportunity, Page, PriceSample, ProtectionEvent};
use crate::services::MonitorSnapshot;
use crate::AppState;

const RECENT_ITEMS: i64 = 5;

#[derive(Serialize)]
pub struct Dashboard {
    pub counts: StoreCounts,
    pub latest_prices: Vec<PriceSample>,
    pub recent_opportunities: Vec<ArbitrageOpportunity>,
    pub recent_protection_events: Vec<ProtectionEvent>,
    pub total_mev_protected: Ciphertext,
    pub monitor: MonitorSnapshot,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct Statistics {
    pub counts: StoreCounts,
    pub skipped_events: i64,
    pub total_mev_protected: Ciphertext,
    pub total_protocol_fees: Ciphertext,
    pub total_lp_rewards: Ciphertext,
    pub pools_monitored: usize,
    pub pairs: Vec<String>,
    pub protection_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/dashboard — aggregate view for the frontend landing page.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<Dashboard>, AppError> {
    let store = &state.store;
    let recent = Page::new(RECENT_ITEMS, 0);

    let counts = store.counts().await?;
    let latest_prices = store.latest_price_per_pool().await?;
    let recent_opportunities = store.list_opportunities(recent).await?;
    let recent_protection_events = store.list_protection_events(recent).await?;

    let totals = store.protection_totals().await?;

    Ok(Json(Dashboard {
        counts,
        latest_prices,
        recent_opportunities,
        recent_protection_events,
        total_mev_protected: state.cipher.encrypt(totals.captured_mev),
        monitor: state.monitor.snapshot(),
        timestamp: Utc::now(),
    }))
}

/// GET /api/statistics — running totals and row counts.
pub async fn statistics(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    let store = &state.store;

    let counts = store.counts().await?;
    let totals = store.protection_totals().await?;

    let mut pairs: Vec<String> = state.config.pools.iter().map(|p| p.pair.clone()).collect();
    pairs.sort();
    pairs.dedup();

    Ok(Json(Statistics {
        skipped_events: counts.protection_events - counts.protected_events,
        total_mev_protected: state.cipher.encrypt(totals.captured_mev),
        total_protocol_fees: state.cipher.encrypt(totals.protocol_fees),
        total_lp_rewards: state.cipher.encrypt(totals.lp_rewards),
        counts,
        pools_monitored: state.config.pools.len(),
        pairs,
        protection_enabled: state.config.protection_enabled,
        timestamp: Utc::now(),
    }))
}
