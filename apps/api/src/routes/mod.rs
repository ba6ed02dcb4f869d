pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::coaching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI coaching tasks
        .route("/analyze", post(handlers::handle_analyze))
        .route(
            "/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route("/interview", post(handlers::handle_interview))
        .route("/rewrite-resume", post(handlers::handle_rewrite_resume))
        .route(
            "/generate-cover-letter",
            post(handlers::handle_cover_letter),
        )
        .route("/chat", post(handlers::handle_chat))
        // Analysis history
        .route("/history", get(handlers::handle_history_list))
        .route("/history/:id", get(handlers::handle_history_get))
        .with_state(state)
}
