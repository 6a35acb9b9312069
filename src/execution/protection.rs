use chrono::Utc;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::{ProtectionTotals, Store};
use crate::fhe::FheCipher;
use crate::models::{ArbitrageOpportunity, LpReward, ProtectionEvent, ProtectionStatus};

/// Synthetic liquidity providers credited on every protected opportunity.
pub const LP_ADDRESSES: [&str; 5] = [
    "0x742d35cc7bf6c8a2d7c69b2d4c8e2f3d4e5a91d2",
    "0x8ba1f109551bd432803012645ac136ddd64dba72",
    "0x1f9840a85d5af5bf1d1762f925bdaddc4201f984",
    "0x5a0b54d5dc17e0aadc383d2db43b0a0d3e029c4c",
    "0xd8da6bf26964af9d7eed9e03e53415d37aa96045",
];

/// Percent of captured MEV redistributed to LPs; the remainder is the protocol fee.
const LP_SHARE_PCT: i64 = 80;
const BPS: i64 = 10_000;
const AMOUNT_DP: u32 = 6;

#[derive(Debug, Clone, Copy)]
pub struct ProtectionParams {
    /// Notional (quote currency) assumed to have been routed through the gap.
    pub trade_notional: Decimal,
    /// Captured value below this is recorded as skipped.
    pub min_mev_capture: Decimal,
}

/// Plaintext figures for one protection event, before encryption.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtectionPlan {
    pub status: ProtectionStatus,
    pub captured_mev: Decimal,
    pub protocol_fee: Decimal,
    pub lp_rewards: Vec<(&'static str, Decimal)>,
}

#[derive(Debug, Clone)]
pub struct ProtectionOutcome {
    pub event: ProtectionEvent,
    pub rewards: Vec<LpReward>,
}

/// Size the captured value from the spread in excess of the threshold and
/// split it 80/20 between the five LPs and the protocol.
pub fn plan_protection(
    spread_bps: Decimal,
    threshold_bps: Decimal,
    params: ProtectionParams,
) -> ProtectionPlan {
    let excess_bps = (spread_bps - threshold_bps).max(Decimal::ZERO);
    let captured_mev = (params.trade_notional * excess_bps / Decimal::from(BPS)).round_dp(AMOUNT_DP);

    if captured_mev < params.min_mev_capture || captured_mev.is_zero() {
        return ProtectionPlan {
            status: ProtectionStatus::Skipped,
            captured_mev,
            protocol_fee: Decimal::ZERO,
            lp_rewards: Vec::new(),
        };
    }

    let lp_pool = (captured_mev * Decimal::from(LP_SHARE_PCT) / Decimal::from(100)).round_dp(AMOUNT_DP);
    let protocol_fee = captured_mev - lp_pool;
    let per_lp = (lp_pool / Decimal::from(LP_ADDRESSES.len() as i64)).round_dp(AMOUNT_DP);

    ProtectionPlan {
        status: ProtectionStatus::Protected,
        captured_mev,
        protocol_fee,
        lp_rewards: LP_ADDRESSES.iter().map(|addr| (*addr, per_lp)).collect(),
    }
}

/// Deterministic pseudo transaction hash for an opportunity.
pub fn synthetic_tx_hash(opportunity_id: Uuid) -> String {
    let digest = Sha256::digest(opportunity_id.as_bytes());
    format!("0x{}", hex::encode(digest))
}

/// Persist the protection event for a flagged opportunity and, when
/// protected, its reward records.
pub async fn apply_protection(
    store: &dyn Store,
    cipher: &FheCipher,
    opportunity: &ArbitrageOpportunity,
    spread_bps: Decimal,
    threshold_bps: Decimal,
    params: ProtectionParams,
) -> anyhow::Result<ProtectionOutcome> {
    let plan = plan_protection(spread_bps, threshold_bps, params);
    let now = Utc::now();

    let event = ProtectionEvent {
        id: Uuid::new_v4(),
        opportunity_id: opportunity.id,
        pair: opportunity.pair.clone(),
        status: plan.status.as_str().to_string(),
        encrypted_fee: cipher.encrypt(plan.protocol_fee),
        encrypted_mev: cipher.encrypt(plan.captured_mev),
        tx_hash: synthetic_tx_hash(opportunity.id),
        created_at: now,
    };
    store.insert_protection_event(&event).await?;
    metrics::counter!("protection_events_total", "status" => plan.status.as_str()).increment(1);

    let rewards: Vec<LpReward> = plan
        .lp_rewards
        .iter()
        .map(|(addr, amount)| LpReward {
            id: Uuid::new_v4(),
            protection_event_id: event.id,
            lp_address: addr.to_string(),
            encrypted_amount: cipher.encrypt(*amount),
            claimed: false,
            created_at: now,
        })
        .collect();

    if !rewards.is_empty() {
        store.insert_rewards(&rewards).await?;
        metrics::counter!("lp_rewards_total").increment(rewards.len() as u64);
    }

    if plan.status == ProtectionStatus::Protected {
        store
            .add_protection_totals(&ProtectionTotals {
                captured_mev: plan.captured_mev,
                protocol_fees: plan.protocol_fee,
                lp_rewards: plan.lp_rewards.iter().map(|(_, amount)| *amount).sum(),
            })
            .await?;
    }

    tracing::info!(
        opportunity_id = %opportunity.id,
        event_id = %event.id,
        status = %plan.status,
        captured_mev = %plan.captured_mev,
        rewards = rewards.len(),
        "Protection applied"
    );

    Ok(ProtectionOutcome { event, rewards })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
