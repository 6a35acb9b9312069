use serde::Serialize;

use crate::models::{ArbitrageOpportunity, PriceSample, ProtectionEvent};

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "price_update")]
    PriceUpdate(PriceSample),

    #[serde(rename = "opportunity_detected")]
    OpportunityDetected(ArbitrageOpportunity),

    #[serde(rename = "protection_applied")]
    ProtectionApplied(ProtectionEvent),
}
