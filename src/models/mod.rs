pub mod opportunity;
pub mod price;
pub mod protection;
pub mod reward;

pub use opportunity::ArbitrageOpportunity;
pub use price::PriceSample;
pub use protection::{ProtectionEvent, ProtectionStatus};
pub use reward::LpReward;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const MAX_PAGE_LIMIT: i64 = 1_000;

/// Resolved limit/offset pair. Listings are always newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
            offset: offset.max(0),
        }
    }
}

/// Query-string parameters shared by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub pool_id: Option<String>,
}

impl ListQuery {
    pub fn page(&self, default_limit: i64) -> Page {
        Page::new(
            self.limit.unwrap_or(default_limit),
            self.offset.unwrap_or(0),
        )
    }
}
