use axum::extract::{Query, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::{ArbitrageOpportunity, ListQuery};
use crate::AppState;

use super::ApiResponse;

const DEFAULT_LIMIT: i64 = 20;

/// GET /api/arbitrage-opportunities?limit&offset
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ArbitrageOpportunity>>>, AppError> {
    let opportunities = state
        .store
        .list_opportunities(query.page(DEFAULT_LIMIT))
        .await?;

    Ok(Json(ApiResponse::ok(opportunities)))
}
