use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fhe::Ciphertext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionStatus {
    /// MEV captured and redistributed to LPs.
    Protected,
    /// Captured value below the configured minimum; nothing distributed.
    Skipped,
}

impl ProtectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectionStatus::Protected => "protected",
            ProtectionStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for ProtectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database row for protection_events table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProtectionEvent {
    pub id: Uuid,
    pub opportunity_id: Uuid,
    pub pair: String,
    pub status: String,
    pub encrypted_fee: Ciphertext,
    pub encrypted_mev: Ciphertext,
    pub tx_hash: String,
    pub created_at: DateTime<Utc>,
}
