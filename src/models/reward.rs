use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fhe::Ciphertext;

/// Database row for lp_rewards table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LpReward {
    pub id: Uuid,
    pub protection_event_id: Uuid,
    pub lp_address: String,
    pub encrypted_amount: Ciphertext,
    pub claimed: bool,
    pub created_at: DateTime<Utc>,
}
