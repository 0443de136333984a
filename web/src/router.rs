use crate::controller::{health_check_controller, webhook_controller};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(webhook_routes(app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

/// Routes for external service webhooks (no session - validated by webhook signature)
fn webhook_routes(app_state: AppState) -> Router {
    let max_body_bytes = app_state.config.max_body_bytes;
    Router::new()
        .route(
            "/webhooks/booking",
            post(webhook_controller::booking_webhook),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(app_state)
}
