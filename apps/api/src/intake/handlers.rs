//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{build_view, ResultView};
use crate::errors::AppError;
use crate::intake::validation::{mime_for_filename, ValidationError};
use crate::models::input::{CandidateInput, UploadMode};
use crate::state::AppState;
use crate::workflow::WorkflowSnapshot;

const FILE_FIELD: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: UploadMode,
}

#[derive(Debug, Deserialize)]
pub struct TextInputRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationPreview {
    pub has_input: bool,
    pub valid: bool,
    pub reason: Option<ValidationError>,
    pub message: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/analysis
pub async fn handle_get_snapshot(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.workflow.snapshot())
}

/// PUT /api/v1/analysis/mode
pub async fn handle_set_mode(
    State(state): State<AppState>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(state.workflow.set_mode(req.mode)?))
}

/// POST /api/v1/analysis/file
///
/// Accepts a multipart body with a `file` part and holds it as the
/// candidate input. Validation happens at submit (or via the preview route).
pub async fn handle_select_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("resume").to_string();
        let mime_type = resolve_mime(field.content_type(), &name);
        let bytes = field.bytes().await?;
        info!("Selected file {} ({}, {} bytes)", name, mime_type, bytes.len());

        let snapshot = state
            .workflow
            .select_input(CandidateInput::file(name, mime_type, bytes))?;
        return Ok(Json(snapshot));
    }

    Err(AppError::Validation(format!(
        "Upload must contain a '{FILE_FIELD}' field"
    )))
}

/// PUT /api/v1/analysis/text
pub async fn handle_select_text(
    State(state): State<AppState>,
    Json(req): Json<TextInputRequest>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(state.workflow.select_input(CandidateInput::text(req.text))?))
}

/// DELETE /api/v1/analysis/input
pub async fn handle_clear_input(
    State(state): State<AppState>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(state.workflow.clear_input()?))
}

/// GET /api/v1/analysis/validation
///
/// Inline feedback while the user edits; never changes workflow state.
pub async fn handle_preview_validation(State(state): State<AppState>) -> Json<ValidationPreview> {
    let preview = match state.workflow.preview_validation() {
        None => ValidationPreview {
            has_input: false,
            valid: false,
            reason: None,
            message: None,
        },
        Some(Ok(())) => ValidationPreview {
            has_input: true,
            valid: true,
            reason: None,
            message: None,
        },
        Some(Err(reason)) => ValidationPreview {
            has_input: true,
            valid: false,
            reason: Some(reason),
            message: Some(reason.to_string()),
        },
    };
    Json(preview)
}

/// POST /api/v1/analysis/submit
///
/// Runs one analysis and returns the settled snapshot. Returns 409 while
/// another analysis is in flight.
pub async fn handle_submit(
    State(state): State<AppState>,
) -> Result<Json<WorkflowSnapshot>, AppError> {
    Ok(Json(state.workflow.submit().await?))
}

/// POST /api/v1/analysis/reset
pub async fn handle_reset(State(state): State<AppState>) -> Json<WorkflowSnapshot> {
    Json(state.workflow.reset())
}

/// GET /api/v1/analysis/view
pub async fn handle_get_view(State(state): State<AppState>) -> Result<Json<ResultView>, AppError> {
    let result = state
        .workflow
        .result()
        .ok_or_else(|| AppError::NotFound("No analysis result available".to_string()))?;
    Ok(Json(build_view(&result, state.config.score_scale)))
}

/// Uses the declared content type unless it is missing or generic, then
/// falls back to the file extension.
fn resolve_mime(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != FALLBACK_MIME => ct.to_string(),
        _ => mime_for_filename(file_name)
            .unwrap_or(FALLBACK_MIME)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mime_prefers_declared_type() {
        assert_eq!(resolve_mime(Some("application/pdf"), "cv.txt"), "application/pdf");
        assert_eq!(resolve_mime(Some("image/png"), "cv.pdf"), "image/png");
    }

    #[test]
    fn test_resolve_mime_falls_back_to_extension() {
        assert_eq!(resolve_mime(None, "cv.pdf"), "application/pdf");
        assert_eq!(resolve_mime(Some(""), "cv.TXT"), "text/plain");
        assert_eq!(
            resolve_mime(Some("application/octet-stream"), "cv.txt"),
            "text/plain"
        );
    }

    #[test]
    fn test_resolve_mime_unknown_extension() {
        assert_eq!(resolve_mime(None, "cv.docx"), "application/octet-stream");
    }
}
