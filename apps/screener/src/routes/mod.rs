pub mod health;
pub mod screen;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Upload limit for multipart screening requests.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jd/parse", post(screen::handle_parse_jd))
        .route("/api/v1/screen", post(screen::handle_screen))
        .route(
            "/api/v1/screen/upload",
            post(screen::handle_screen_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}
