pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route("/api/v1/resumes/:user_id", get(handlers::handle_get_resume))
        .route("/api/v1/jd/clean", post(handlers::handle_clean_jd))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
