use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::broadcast;
use tokio::time::sleep;
use uuid::Uuid;

use crate::api::ws_types::WsMessage;
use crate::config::PoolConfig;
use crate::db::Store;
use crate::execution::{apply_protection, ProtectionParams};
use crate::fhe::FheCipher;
use crate::intelligence::{decrypt_samples, detect_spreads, display_bps, threshold_bps};
use crate::models::{ArbitrageOpportunity, PriceSample};

use super::MonitorStatus;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub interval: Duration,
    /// Sleep after a failed iteration, instead of `interval`.
    pub error_backoff: Duration,
    pub pools: Vec<PoolConfig>,
    pub base_price: Decimal,
    pub volatility_bps: Decimal,
    pub start_block: i64,
    pub lookback: i64,
    pub min_profit_bps: Decimal,
    pub swap_fee_bps: Decimal,
    pub trade_notional: Decimal,
    pub min_mev_capture: Decimal,
    pub protection_enabled: bool,
}

/// What one pass of the monitor produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IterationSummary {
    pub block_number: i64,
    pub samples: usize,
    pub opportunities: usize,
    pub protection_events: usize,
}

/// Synthetic price: `base × (1 + u)`, `u` uniform in ±`volatility_bps`.
pub fn synthesize_price<R: Rng>(base: Decimal, volatility_bps: Decimal, rng: &mut R) -> Decimal {
    // Jitter in hundredths of a basis point (1e-6).
    let span = (volatility_bps.abs() * Decimal::from(100))
        .round()
        .to_i64()
        .unwrap_or(0);
    let jitter = rng.gen_range(-span..=span);
    (base * (Decimal::ONE + Decimal::new(jitter, 6))).round_dp(6)
}

/// Sequential polling loop: sample every pool, persist, detect, protect.
pub struct PriceMonitor {
    store: Arc<dyn Store>,
    cipher: FheCipher,
    config: MonitorConfig,
    status: Arc<MonitorStatus>,
    events_tx: broadcast::Sender<WsMessage>,
    rng: StdRng,
    next_block: i64,
}

impl PriceMonitor {
    pub fn new(
        store: Arc<dyn Store>,
        cipher: FheCipher,
        config: MonitorConfig,
        status: Arc<MonitorStatus>,
        events_tx: broadcast::Sender<WsMessage>,
    ) -> Self {
        let next_block = config.start_block;
        Self {
            store,
            cipher,
            config,
            status,
            events_tx,
            rng: StdRng::from_entropy(),
            next_block,
        }
    }

    /// Replace the entropy-seeded generator, for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run forever. Failed iterations are logged and retried after the
    /// backoff interval.
    pub async fn run(mut self) {
        self.status.mark_running();
        tracing::info!(
            pools = self.config.pools.len(),
            interval_secs = self.config.interval.as_secs(),
            backoff_secs = self.config.error_backoff.as_secs(),
            "Price monitor started"
        );

        loop {
            let delay = match self.run_iteration().await {
                Ok(summary) => {
                    tracing::debug!(
                        block = summary.block_number,
                        samples = summary.samples,
                        opportunities = summary.opportunities,
                        protection_events = summary.protection_events,
                        "Price monitor iteration complete"
                    );
                    self.config.interval
                }
                Err(e) => {
                    self.status.record_error(&e);
                    metrics::counter!("monitor_errors_total").increment(1);
                    tracing::error!(
                        error = %e,
                        backoff_secs = self.config.error_backoff.as_secs(),
                        "Price monitor iteration failed"
                    );
                    self.config.error_backoff
                }
            };

            sleep(delay).await;
        }
    }

    /// One pass over every configured pool. Each sample is persisted before
    /// detection runs for its pair.
    pub async fn run_iteration(&mut self) -> anyhow::Result<IterationSummary> {
        let started = Instant::now();
        let block_number = self.next_block;
        self.next_block += 1;

        let mut summary = IterationSummary {
            block_number,
            ..Default::default()
        };

        let pools = self.config.pools.clone();
        for pool in &pools {
            let price = synthesize_price(self.config.base_price, self.config.volatility_bps, &mut self.rng);
            let sample = PriceSample::new(
                &pool.pool_id,
                &pool.venue,
                &pool.pair,
                self.cipher.encrypt(price),
                block_number,
            );

            self.store.insert_price(&sample).await?;
            metrics::counter!("price_samples_total").increment(1);
            summary.samples += 1;

            tracing::debug!(
                pool_id = %pool.pool_id,
                pair = %pool.pair,
                block = block_number,
                "Price sample recorded"
            );
            let _ = self.events_tx.send(WsMessage::PriceUpdate(sample));

            let (opportunities, events) = self.detect_for_pair(&pool.pair).await?;
            summary.opportunities += opportunities;
            summary.protection_events += events;
        }

        self.status.record_success(block_number);
        metrics::histogram!("monitor_iteration_seconds").record(started.elapsed().as_secs_f64());

        Ok(summary)
    }

    /// Returns (opportunities recorded, protection events recorded).
    async fn detect_for_pair(&self, pair: &str) -> anyhow::Result<(usize, usize)> {
        let samples = self
            .store
            .recent_prices_for_pair(pair, self.config.lookback)
            .await?;
        let points = decrypt_samples(&self.cipher, &samples);
        let threshold = threshold_bps(self.config.min_profit_bps, self.config.swap_fee_bps);

        let mut opportunities = 0;
        let mut events = 0;

        for signal in detect_spreads(&points, threshold) {
            let opportunity = ArbitrageOpportunity {
                id: Uuid::new_v4(),
                pair: pair.to_string(),
                buy_pool_id: signal.buy_pool_id.clone(),
                sell_pool_id: signal.sell_pool_id.clone(),
                encrypted_spread: self.cipher.encrypt(display_bps(signal.spread_bps)),
                encrypted_threshold: self.cipher.encrypt(signal.threshold_bps),
                protection_triggered: self.config.protection_enabled,
                block_number: signal.block_number,
                created_at: Utc::now(),
            };

            self.store.insert_opportunity(&opportunity).await?;
            metrics::counter!("opportunities_detected_total").increment(1);
            opportunities += 1;

            tracing::info!(
                pair = %pair,
                buy_pool = %signal.buy_pool_id,
                sell_pool = %signal.sell_pool_id,
                spread_bps = %display_bps(signal.spread_bps),
                threshold_bps = %signal.threshold_bps,
                "Arbitrage opportunity detected"
            );
            let _ = self
                .events_tx
                .send(WsMessage::OpportunityDetected(opportunity.clone()));

            if !self.config.protection_enabled {
                continue;
            }

            let outcome = apply_protection(
                self.store.as_ref(),
                &self.cipher,
                &opportunity,
                signal.spread_bps,
                signal.threshold_bps,
                ProtectionParams {
                    trade_notional: self.config.trade_notional,
                    min_mev_capture: self.config.min_mev_capture,
                },
            )
            .await?;
            events += 1;

            let _ = self
                .events_tx
                .send(WsMessage::ProtectionApplied(outcome.event));
        }

        Ok((opportunities, events))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
