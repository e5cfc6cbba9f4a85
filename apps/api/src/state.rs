use crate::config::Config;
use crate::preferences::ThemePreference;
use crate::workflow::WorkflowController;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single intake session this process serves.
    pub workflow: WorkflowController,
    pub theme: ThemePreference,
    pub config: Config,
}
