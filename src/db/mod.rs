pub mod memory;
pub mod opportunity_repo;
pub mod postgres;
pub mod price_repo;
pub mod protection_repo;
pub mod reward_repo;
pub mod totals_repo;

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::models::{ArbitrageOpportunity, LpReward, Page, PriceSample, ProtectionEvent};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Row counts shown on the dashboard and statistics endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub price_samples: i64,
    pub opportunities: i64,
    pub protection_events: i64,
    pub protected_events: i64,
    pub lp_rewards: i64,
    pub unique_lps: i64,
}

/// Plaintext running sums over protected events, kept alongside the rows so
/// aggregate endpoints never rescan them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProtectionTotals {
    pub captured_mev: Decimal,
    pub protocol_fees: Decimal,
    pub lp_rewards: Decimal,
}

impl ProtectionTotals {
    pub fn add(&mut self, other: &ProtectionTotals) {
        self.captured_mev += other.captured_mev;
        self.protocol_fees += other.protocol_fees;
        self.lp_rewards += other.lp_rewards;
    }
}

/// Persistence seam shared by the monitor loop and the HTTP handlers.
///
/// Records are append-only. Listings are newest first.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name for status output.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> anyhow::Result<()>;

    async fn insert_price(&self, sample: &PriceSample) -> anyhow::Result<()>;
    async fn recent_prices_for_pair(&self, pair: &str, limit: i64) -> anyhow::Result<Vec<PriceSample>>;
    async fn list_prices(&self, page: Page, pool_id: Option<&str>) -> anyhow::Result<Vec<PriceSample>>;
    async fn latest_price_per_pool(&self) -> anyhow::Result<Vec<PriceSample>>;

    async fn insert_opportunity(&self, opportunity: &ArbitrageOpportunity) -> anyhow::Result<()>;
    async fn list_opportunities(&self, page: Page) -> anyhow::Result<Vec<ArbitrageOpportunity>>;

    async fn insert_protection_event(&self, event: &ProtectionEvent) -> anyhow::Result<()>;
    async fn list_protection_events(&self, page: Page) -> anyhow::Result<Vec<ProtectionEvent>>;

    async fn insert_rewards(&self, rewards: &[LpReward]) -> anyhow::Result<()>;
    async fn list_rewards(&self, page: Page) -> anyhow::Result<Vec<LpReward>>;
    async fn rewards_for_address(&self, lp_address: &str) -> anyhow::Result<Vec<LpReward>>;

    async fn add_protection_totals(&self, delta: &ProtectionTotals) -> anyhow::Result<()>;
    async fn protection_totals(&self) -> anyhow::Result<ProtectionTotals>;

    async fn counts(&self) -> anyhow::Result<StoreCounts>;

    async fn close(&self) {}
}

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Postgres when a URL is configured, otherwise the in-memory store keeping at
/// most `memory_max_rows` rows per table.
pub async fn connect(database_url: Option<&str>, memory_max_rows: usize) -> anyhow::Result<Arc<dyn Store>> {
    match database_url {
        Some(url) => {
            let pool = init_pool(url).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(MemoryStore::with_max_rows(memory_max_rows)))
        }
    }
}
