use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::preferences::Theme;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

/// GET /api/v1/preferences/theme
pub async fn handle_get_theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme.get(),
    })
}

/// PUT /api/v1/preferences/theme
pub async fn handle_set_theme(
    State(state): State<AppState>,
    Json(req): Json<ThemeBody>,
) -> Json<ThemeBody> {
    state.theme.set(req.theme);
    Json(ThemeBody { theme: req.theme })
}

/// POST /api/v1/preferences/theme/toggle
pub async fn handle_toggle_theme(State(state): State<AppState>) -> Json<ThemeBody> {
    Json(ThemeBody {
        theme: state.theme.toggle(),
    })
}
