use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{ArbitrageOpportunity, LpReward, Page, PriceSample, ProtectionEvent, ProtectionStatus};

use super::{
    opportunity_repo, price_repo, protection_repo, reward_repo, totals_repo, ProtectionTotals, Store,
    StoreCounts,
};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_price(&self, sample: &PriceSample) -> anyhow::Result<()> {
        price_repo::insert_price(&self.pool, sample).await
    }

    async fn recent_prices_for_pair(&self, pair: &str, limit: i64) -> anyhow::Result<Vec<PriceSample>> {
        price_repo::get_recent_for_pair(&self.pool, pair, limit).await
    }

    async fn list_prices(&self, page: Page, pool_id: Option<&str>) -> anyhow::Result<Vec<PriceSample>> {
        price_repo::list_prices(&self.pool, page, pool_id).await
    }

    async fn latest_price_per_pool(&self) -> anyhow::Result<Vec<PriceSample>> {
        price_repo::get_latest_per_pool(&self.pool).await
    }

    async fn insert_opportunity(&self, opportunity: &ArbitrageOpportunity) -> anyhow::Result<()> {
        opportunity_repo::insert_opportunity(&self.pool, opportunity).await
    }

    async fn list_opportunities(&self, page: Page) -> anyhow::Result<Vec<ArbitrageOpportunity>> {
        opportunity_repo::list_opportunities(&self.pool, page).await
    }

    async fn insert_protection_event(&self, event: &ProtectionEvent) -> anyhow::Result<()> {
        protection_repo::insert_event(&self.pool, event).await
    }

    async fn list_protection_events(&self, page: Page) -> anyhow::Result<Vec<ProtectionEvent>> {
        protection_repo::list_events(&self.pool, page).await
    }

    async fn insert_rewards(&self, rewards: &[LpReward]) -> anyhow::Result<()> {
        reward_repo::insert_rewards(&self.pool, rewards).await
    }

    async fn list_rewards(&self, page: Page) -> anyhow::Result<Vec<LpReward>> {
        reward_repo::list_rewards(&self.pool, page).await
    }

    async fn rewards_for_address(&self, lp_address: &str) -> anyhow::Result<Vec<LpReward>> {
        reward_repo::get_rewards_by_address(&self.pool, lp_address).await
    }

    async fn add_protection_totals(&self, delta: &ProtectionTotals) -> anyhow::Result<()> {
        totals_repo::add_totals(&self.pool, delta).await
    }

    async fn protection_totals(&self) -> anyhow::Result<ProtectionTotals> {
        totals_repo::get_totals(&self.pool).await
    }

    async fn counts(&self) -> anyhow::Result<StoreCounts> {
        let row: (i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM price_samples),
                (SELECT COUNT(*) FROM arbitrage_opportunities),
                (SELECT COUNT(*) FROM protection_events),
                (SELECT COUNT(*) FROM protection_events WHERE status = $1),
                (SELECT COUNT(*) FROM lp_rewards),
                (SELECT COUNT(DISTINCT lp_address) FROM lp_rewards)
            "#,
        )
        .bind(ProtectionStatus::Protected.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreCounts {
            price_samples: row.0,
            opportunities: row.1,
            protection_events: row.2,
            protected_events: row.3,
            lp_rewards: row.4,
            unique_lps: row.5,
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
