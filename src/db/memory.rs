use std::collections::{BTreeMap, HashSet, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::models::{ArbitrageOpportunity, LpReward, Page, PriceSample, ProtectionEvent, ProtectionStatus};

use super::{ProtectionTotals, Store, StoreCounts};

pub const DEFAULT_MAX_ROWS: usize = 50_000;

#[derive(Default)]
struct Tables {
    prices: VecDeque<PriceSample>,
    opportunities: VecDeque<ArbitrageOpportunity>,
    events: VecDeque<ProtectionEvent>,
    rewards: VecDeque<LpReward>,
    // Counters cover every insert, including rows since evicted.
    counts: StoreCounts,
    lp_addresses: HashSet<String>,
    totals: ProtectionTotals,
}

/// Process-local store used when no database is configured, and in tests.
///
/// Each table keeps at most `max_rows` rows; the oldest are evicted first.
/// Rows are kept in insertion order, which is also creation order.
pub struct MemoryStore {
    tables: RwLock<Tables>,
    max_rows: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_max_rows(DEFAULT_MAX_ROWS)
    }

    pub fn with_max_rows(max_rows: usize) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            max_rows: max_rows.max(1),
        }
    }
}

fn push_bounded<T>(rows: &mut VecDeque<T>, row: T, max_rows: usize) {
    rows.push_back(row);
    while rows.len() > max_rows {
        rows.pop_front();
    }
}

fn newest_first<'a, T, I>(rows: I, page: Page) -> Vec<T>
where
    T: Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
{
    rows.rev()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn insert_price(&self, sample: &PriceSample) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        push_bounded(&mut tables.prices, sample.clone(), self.max_rows);
        tables.counts.price_samples += 1;
        Ok(())
    }

    async fn recent_prices_for_pair(&self, pair: &str, limit: i64) -> anyhow::Result<Vec<PriceSample>> {
        let tables = self.tables.read();
        Ok(tables
            .prices
            .iter()
            .rev()
            .filter(|p| p.pair == pair)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_prices(&self, page: Page, pool_id: Option<&str>) -> anyhow::Result<Vec<PriceSample>> {
        let tables = self.tables.read();
        Ok(match pool_id {
            Some(id) => newest_first(tables.prices.iter().filter(|p| p.pool_id == id), page),
            None => newest_first(tables.prices.iter(), page),
        })
    }

    async fn latest_price_per_pool(&self) -> anyhow::Result<Vec<PriceSample>> {
        let tables = self.tables.read();
        let mut latest: BTreeMap<&str, &PriceSample> = BTreeMap::new();
        for sample in tables.prices.iter().rev() {
            latest.entry(sample.pool_id.as_str()).or_insert(sample);
        }
        Ok(latest.into_values().cloned().collect())
    }

    async fn insert_opportunity(&self, opportunity: &ArbitrageOpportunity) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        push_bounded(&mut tables.opportunities, opportunity.clone(), self.max_rows);
        tables.counts.opportunities += 1;
        Ok(())
    }

    async fn list_opportunities(&self, page: Page) -> anyhow::Result<Vec<ArbitrageOpportunity>> {
        Ok(newest_first(self.tables.read().opportunities.iter(), page))
    }

    async fn insert_protection_event(&self, event: &ProtectionEvent) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        push_bounded(&mut tables.events, event.clone(), self.max_rows);
        tables.counts.protection_events += 1;
        if event.status == ProtectionStatus::Protected.as_str() {
            tables.counts.protected_events += 1;
        }
        Ok(())
    }

    async fn list_protection_events(&self, page: Page) -> anyhow::Result<Vec<ProtectionEvent>> {
        Ok(newest_first(self.tables.read().events.iter(), page))
    }

    async fn insert_rewards(&self, rewards: &[LpReward]) -> anyhow::Result<()> {
        let mut tables = self.tables.write();
        for reward in rewards {
            tables.lp_addresses.insert(reward.lp_address.clone());
            push_bounded(&mut tables.rewards, reward.clone(), self.max_rows);
        }
        tables.counts.lp_rewards += rewards.len() as i64;
        Ok(())
    }

    async fn list_rewards(&self, page: Page) -> anyhow::Result<Vec<LpReward>> {
        Ok(newest_first(self.tables.read().rewards.iter(), page))
    }

    async fn rewards_for_address(&self, lp_address: &str) -> anyhow::Result<Vec<LpReward>> {
        let tables = self.tables.read();
        Ok(tables
            .rewards
            .iter()
            .rev()
            .filter(|r| r.lp_address == lp_address)
            .cloned()
            .collect())
    }

    async fn add_protection_totals(&self, delta: &ProtectionTotals) -> anyhow::Result<()> {
        self.tables.write().totals.add(delta);
        Ok(())
    }

    async fn protection_totals(&self) -> anyhow::Result<ProtectionTotals> {
        Ok(self.tables.read().totals)
    }

    async fn counts(&self) -> anyhow::Result<StoreCounts> {
        let tables = self.tables.read();
        Ok(StoreCounts {
            unique_lps: tables.lp_addresses.len() as i64,
            ..tables.counts.clone()
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
