pub mod health;
pub mod text;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/text", post(text::handle_set_text))
        .route("/layout", get(text::handle_get_layout))
        .with_state(state)
}
