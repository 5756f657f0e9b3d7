//! HTTP routing for the car API.

mod cars;
mod health;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

/// Builds the application router: the versioned car API, the health probe,
/// and the middleware stack.
pub fn app_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", cars::router())
        .merge(health::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
