use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all certchain endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/verify", get(handler::verify_handler))
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/certificates", post(handler::issue_handler))
        .route("/v1/mine", post(handler::mine_handler))
        .route("/v1/chain", get(handler::chain_handler))
        .route("/v1/chain/validate", get(handler::validate_handler))
        .route("/v1/pending", get(handler::pending_handler))
        .route("/v1/dashboard", get(handler::dashboard_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
