use axum::extract::{Query, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::{ListQuery, PriceSample};
use crate::AppState;

use super::ApiResponse;

const DEFAULT_LIMIT: i64 = 50;

/// GET /api/prices?limit&offset&pool_id
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<PriceSample>>>, AppError> {
    let prices = state
        .store
        .list_prices(query.page(DEFAULT_LIMIT), query.pool_id.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(prices)))
}
