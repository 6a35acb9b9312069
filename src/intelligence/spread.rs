use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::fhe::FheCipher;
use crate::models::PriceSample;

const BPS: i64 = 10_000;
const DISPLAY_DP: u32 = 6;

/// A price sample after decryption.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub sample_id: Uuid,
    pub pool_id: String,
    pub price: Decimal,
    pub block_number: i64,
}

/// A cross-pool price gap wider than the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadSignal {
    /// Cheaper pool.
    pub buy_pool_id: String,
    pub sell_pool_id: String,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub spread_bps: Decimal,
    pub threshold_bps: Decimal,
    /// Later of the two samples' blocks.
    pub block_number: i64,
}

/// Minimum spread worth acting on: the profit floor plus one swap fee per leg.
pub fn threshold_bps(min_profit_bps: Decimal, swap_fee_bps: Decimal) -> Decimal {
    min_profit_bps + swap_fee_bps * Decimal::from(2)
}

/// Relative gap between two prices in basis points of the lower one,
/// unrounded. `None` when the lower price is not positive.
pub fn spread_bps(a: Decimal, b: Decimal) -> Option<Decimal> {
    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    if low <= Decimal::ZERO {
        return None;
    }
    Some((high - low) / low * Decimal::from(BPS))
}

/// Spread as stored and served. Rounded away from zero so a flagged spread
/// never shows at or below its threshold.
pub fn display_bps(spread: Decimal) -> Decimal {
    spread.round_dp_with_strategy(DISPLAY_DP, RoundingStrategy::AwayFromZero)
}

/// Decrypt stored samples, dropping any that fail to open.
pub fn decrypt_samples(cipher: &FheCipher, samples: &[PriceSample]) -> Vec<PricePoint> {
    samples
        .iter()
        .filter_map(|s| match cipher.decrypt(&s.encrypted_price) {
            Ok(price) => Some(PricePoint {
                sample_id: s.id,
                pool_id: s.pool_id.clone(),
                price,
                block_number: s.block_number,
            }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    sample_id = %s.id,
                    pool_id = %s.pool_id,
                    "Skipping undecryptable price sample"
                );
                None
            }
        })
        .collect()
}

/// Compare every pair of points from distinct pools and keep those whose
/// spread is strictly greater than `threshold`.
///
/// Repeated pairs are not deduplicated; the same two pools may be flagged
/// more than once if several of their samples are in the window.
pub fn detect_spreads(points: &[PricePoint], threshold: Decimal) -> Vec<SpreadSignal> {
    let mut signals = Vec::new();

    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            if a.pool_id == b.pool_id {
                continue;
            }

            let Some(spread) = spread_bps(a.price, b.price) else {
                continue;
            };

            if spread <= threshold {
                continue;
            }

            let (buy, sell) = if a.price <= b.price { (a, b) } else { (b, a) };
            signals.push(SpreadSignal {
                buy_pool_id: buy.pool_id.clone(),
                sell_pool_id: sell.pool_id.clone(),
                buy_price: buy.price,
                sell_price: sell.price,
                spread_bps: spread,
                threshold_bps: threshold,
                block_number: a.block_number.max(b.block_number),
            });
        }
    }

    signals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
