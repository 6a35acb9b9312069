use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::fhe::Ciphertext;

/// Database row for price_samples table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PriceSample {
    pub id: Uuid,
    pub pool_id: String,
    pub venue: String,
    pub pair: String,
    pub encrypted_price: Ciphertext,
    pub block_number: i64,
    pub timestamp: DateTime<Utc>,
}

impl PriceSample {
    pub fn new(
        pool_id: &str,
        venue: &str,
        pair: &str,
        encrypted_price: Ciphertext,
        block_number: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            pool_id: pool_id.to_string(),
            venue: venue.to_string(),
            pair: pair.to_string(),
            encrypted_price,
            block_number,
            timestamp: Utc::now(),
        }
    }
}
