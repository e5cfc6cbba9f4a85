pub mod health;
pub mod preferences;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::intake::handlers;
use crate::state::AppState;

/// Room above the 16 MiB file cap so oversize files reach the validator and
/// get its message instead of a bare 413.
const MAX_REQUEST_BODY_BYTES: usize = 32 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis workflow
        .route("/api/v1/analysis", get(handlers::handle_get_snapshot))
        .route("/api/v1/analysis/mode", put(handlers::handle_set_mode))
        .route("/api/v1/analysis/file", post(handlers::handle_select_file))
        .route("/api/v1/analysis/text", put(handlers::handle_select_text))
        .route("/api/v1/analysis/input", delete(handlers::handle_clear_input))
        .route(
            "/api/v1/analysis/validation",
            get(handlers::handle_preview_validation),
        )
        .route("/api/v1/analysis/submit", post(handlers::handle_submit))
        .route("/api/v1/analysis/reset", post(handlers::handle_reset))
        .route("/api/v1/analysis/view", get(handlers::handle_get_view))
        // Preferences
        .route(
            "/api/v1/preferences/theme",
            get(preferences::handle_get_theme).put(preferences::handle_set_theme),
        )
        .route(
            "/api/v1/preferences/theme/toggle",
            post(preferences::handle_toggle_theme),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
