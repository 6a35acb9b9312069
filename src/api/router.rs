use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::AppState;

use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/api", get(handlers::root::root))
        .route("/api/", get(handlers::root::root))
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/status", get(handlers::health::status))
        // Aggregates
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route("/api/statistics", get(handlers::dashboard::statistics))
        // Listings
        .route("/api/prices", get(handlers::prices::list))
        .route("/api/arbitrage-opportunities", get(handlers::opportunities::list))
        .route("/api/protection-events", get(handlers::protection::list))
        .route("/api/lp-rewards", get(handlers::rewards::list))
        .route("/api/lp-rewards/:address", get(handlers::rewards::by_address))
        // Live feed + scrape
        .route("/ws", get(handlers::ws::handler))
        .route("/metrics", get(handlers::metrics::render))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
