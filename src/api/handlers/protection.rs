use axum::extract::{Query, State};
use axum::Json;

use crate::errors::AppError;
use crate::models::{ListQuery, ProtectionEvent};
use crate::AppState;

use super::ApiResponse;

const DEFAULT_LIMIT: i64 = 50;

/// GET /api/protection-events?limit&offset
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ProtectionEvent>>>, AppError> {
    let events = state
        .store
        .list_protection_events(query.page(DEFAULT_LIMIT))
        .await?;

    Ok(Json(ApiResponse::ok(events)))
}
