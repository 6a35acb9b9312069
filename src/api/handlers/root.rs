use axum::Json;
use serde_json::{json, Value};

/// GET /api/ — service banner
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "FHEAP - FHE Arbitrage Protection Backend",
        "description": "Simulated encrypted DEX price feeds, arbitrage detection and MEV protection",
        "documentation": "See README.md for smart contract deployment and usage",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
