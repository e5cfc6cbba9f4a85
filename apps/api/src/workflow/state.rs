use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::analysis::{Failure, FailureKind};
use crate::analysis_client::{AnalysisRequest, RequestPath};
use crate::models::analysis::AnalysisResult;
use crate::models::input::{CandidateSummary, UploadMode};

/// The request currently on the wire.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub attempt_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub request: AnalysisRequest,
}

/// The single source of truth for the workflow. `is_busy`, `result` and
/// `error_message` are all read from here.
#[derive(Debug, Clone, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Validating {
        attempt_id: Uuid,
    },
    Submitting(PendingRequest),
    Success(AnalysisResult),
    Failed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failed,
}

impl WorkflowState {
    pub fn phase(&self) -> Phase {
        match self {
            WorkflowState::Idle => Phase::Idle,
            WorkflowState::Validating { .. } => Phase::Validating,
            WorkflowState::Submitting(_) => Phase::Submitting,
            WorkflowState::Success(_) => Phase::Success,
            WorkflowState::Failed(_) => Phase::Failed,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Validating { .. } | WorkflowState::Submitting(_)
        )
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            WorkflowState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            WorkflowState::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.failure().map(|f| f.message.as_str())
    }

    /// Id of the attempt that owns the state, while one is running.
    pub(crate) fn attempt_id(&self) -> Option<Uuid> {
        match self {
            WorkflowState::Validating { attempt_id } => Some(*attempt_id),
            WorkflowState::Submitting(pending) => Some(pending.attempt_id),
            _ => None,
        }
    }

    fn attempt(&self) -> Option<AttemptInfo> {
        match self {
            WorkflowState::Submitting(pending) => Some(AttemptInfo {
                id: pending.attempt_id,
                path: pending.request.path(),
                started_at: pending.started_at,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptInfo {
    pub id: Uuid,
    pub path: RequestPath,
    pub started_at: DateTime<Utc>,
}

/// Consistent, point-in-time view of the workflow for the presentation
/// layer. Built under a single lock acquisition.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub phase: Phase,
    pub is_busy: bool,
    pub mode: UploadMode,
    pub candidate: Option<CandidateSummary>,
    pub attempt: Option<AttemptInfo>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub error_kind: Option<FailureKind>,
}

impl WorkflowSnapshot {
    pub(crate) fn capture(
        state: &WorkflowState,
        mode: UploadMode,
        candidate: Option<CandidateSummary>,
    ) -> Self {
        Self {
            phase: state.phase(),
            is_busy: state.is_busy(),
            mode,
            candidate,
            attempt: state.attempt(),
            result: state.result().cloned(),
            error: state.error_message().map(String::from),
            error_kind: state.failure().map(|f| f.kind),
        }
    }
}

/// Commands the workflow refuses without changing state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("An analysis is already in progress")]
    Busy,

    #[error("Reset the current analysis before starting a new one")]
    ResetRequired,

    #[error("Input does not match the active {active:?} upload mode")]
    ModeMismatch { active: UploadMode },
}
