use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fhe::Ciphertext;

/// Database row for arbitrage_opportunities table.
///
/// Spread and threshold are stored in basis points.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ArbitrageOpportunity {
    pub id: Uuid,
    pub pair: String,
    pub buy_pool_id: String,
    pub sell_pool_id: String,
    pub encrypted_spread: Ciphertext,
    pub encrypted_threshold: Ciphertext,
    pub protection_triggered: bool,
    pub block_number: i64,
    pub created_at: DateTime<Utc>,
}
