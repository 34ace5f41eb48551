pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/render", post(handlers::handle_render))
        .route(
            "/api/v1/resumes/normalize",
            post(handlers::handle_normalize),
        )
        .with_state(state)
}
