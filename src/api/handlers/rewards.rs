use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::fhe::Ciphertext;
use crate::models::{ListQuery, LpReward};
use crate::AppState;

use super::{encrypted_total, ApiResponse};

const DEFAULT_LIMIT: i64 = 50;

#[derive(Serialize)]
pub struct AddressRewards {
    pub address: String,
    pub reward_count: usize,
    pub unclaimed_count: usize,
    pub total_rewards: Ciphertext,
    pub rewards: Vec<LpReward>,
}

/// GET /api/lp-rewards?limit&offset
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<LpReward>>>, AppError> {
    let rewards = state.store.list_rewards(query.page(DEFAULT_LIMIT)).await?;

    Ok(Json(ApiResponse::ok(rewards)))
}

/// GET /api/lp-rewards/{address} — every reward credited to one LP.
/// Unknown addresses return an empty list.
pub async fn by_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<AddressRewards>>, AppError> {
    let address = normalize_address(&address)
        .ok_or_else(|| AppError::BadRequest(format!("invalid address: {address}")))?;

    let rewards = state.store.rewards_for_address(&address).await?;
    let total_rewards = encrypted_total(&state.cipher, rewards.iter().map(|r| &r.encrypted_amount));

    Ok(Json(ApiResponse::ok(AddressRewards {
        address,
        reward_count: rewards.len(),
        unclaimed_count: rewards.iter().filter(|r| !r.claimed).count(),
        total_rewards,
        rewards,
    })))
}

/// Lower-case a `0x`-prefixed 20-byte hex address; `None` if malformed.
fn normalize_address(raw: &str) -> Option<String> {
    let lower = raw.trim().to_lowercase();
    let hex = lower.strip_prefix("0x")?;
    if hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(lower)
    } else {
        None
    }
}
