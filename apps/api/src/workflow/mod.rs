//! Workflow Controller — the intake state machine.
//!
//! Idle → Validating → Submitting → Success | Failed, and back to Idle on
//! reset. At most one request is in flight: a submit while validating or
//! submitting is refused with `WorkflowError::Busy` and issues nothing.
//!
//! The session lives behind a `std::sync::Mutex` that is never held across
//! an await. Each attempt gets an id; an outcome whose attempt is no longer
//! the current one (because of a reset) is dropped on arrival.

pub mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::analysis::{normalize, AnalysisError};
use crate::analysis_client::{AnalysisClient, AnalysisRequest, TransportError};
use crate::intake::validation::{self, validate, ValidationError, ValidationOutcome};
use crate::models::analysis::AnalysisResult;
use crate::models::input::{CandidateInput, UploadMode};

pub use state::{Phase, WorkflowError, WorkflowSnapshot, WorkflowState};
use state::PendingRequest;

#[derive(Debug, Default)]
struct Session {
    state: WorkflowState,
    mode: UploadMode,
    /// Held beside the state, not inside it: edits never change the phase.
    candidate: Option<CandidateInput>,
    cancel: Option<CancellationToken>,
}

impl Session {
    fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot::capture(
            &self.state,
            self.mode,
            self.candidate.as_ref().map(CandidateInput::summary),
        )
    }

    fn ensure_editable(&self) -> Result<(), WorkflowError> {
        match self.state {
            WorkflowState::Validating { .. } | WorkflowState::Submitting(_) => {
                Err(WorkflowError::Busy)
            }
            WorkflowState::Success(_) => Err(WorkflowError::ResetRequired),
            WorkflowState::Idle | WorkflowState::Failed(_) => Ok(()),
        }
    }

    fn owns(&self, attempt_id: Uuid) -> bool {
        self.state.attempt_id() == Some(attempt_id)
    }
}

/// Cheap to clone; clones share one session.
#[derive(Clone)]
pub struct WorkflowController {
    client: Arc<dyn AnalysisClient>,
    /// Named in connectivity error messages.
    service_url: String,
    session: Arc<Mutex<Session>>,
}

impl WorkflowController {
    pub fn new(client: Arc<dyn AnalysisClient>, service_url: impl Into<String>) -> Self {
        Self {
            client,
            service_url: service_url.into(),
            session: Arc::new(Mutex::new(Session::default())),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.session().snapshot()
    }

    pub fn result(&self) -> Option<AnalysisResult> {
        self.session().state.result().cloned()
    }

    /// Switches between file and text intake, discarding the held input.
    pub fn set_mode(&self, mode: UploadMode) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut session = self.session();
        session.ensure_editable()?;
        if session.mode != mode {
            debug!("Upload mode {:?} -> {:?}", session.mode, mode);
            session.mode = mode;
            session.candidate = None;
        }
        Ok(session.snapshot())
    }

    /// Replaces the held input. Does not validate and does not change phase.
    pub fn select_input(&self, input: CandidateInput) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut session = self.session();
        session.ensure_editable()?;
        if input.mode() != session.mode {
            return Err(WorkflowError::ModeMismatch {
                active: session.mode,
            });
        }
        session.candidate = Some(input);
        Ok(session.snapshot())
    }

    pub fn clear_input(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut session = self.session();
        session.ensure_editable()?;
        session.candidate = None;
        Ok(session.snapshot())
    }

    /// Validates the held input without touching the state. `None` when
    /// nothing is held.
    pub fn preview_validation(&self) -> Option<Result<(), ValidationError>> {
        self.session().candidate.as_ref().map(validation::check)
    }

    /// Validates the held input and, if valid, runs one analysis request.
    ///
    /// Resolves once the attempt settles. The request itself runs on its own
    /// task, so dropping this future does not strand the workflow in
    /// `Submitting`.
    pub async fn submit(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        let (attempt_id, mode, candidate) = {
            let mut session = self.session();
            match session.state {
                WorkflowState::Validating { .. } | WorkflowState::Submitting(_) => {
                    debug!("Submit ignored: an analysis is already in flight");
                    return Err(WorkflowError::Busy);
                }
                WorkflowState::Success(_) => return Err(WorkflowError::ResetRequired),
                WorkflowState::Idle | WorkflowState::Failed(_) => {}
            }
            let attempt_id = Uuid::new_v4();
            session.state = WorkflowState::Validating { attempt_id };
            (attempt_id, session.mode, session.candidate.clone())
        };

        let outcome = match (candidate, mode) {
            (Some(input), _) => validate(input),
            (None, UploadMode::File) => ValidationOutcome::Rejected(ValidationError::NoFile),
            (None, UploadMode::Text) => ValidationOutcome::Rejected(ValidationError::Empty),
        };

        let request = match AnalysisRequest::try_from(outcome) {
            Ok(request) => request,
            Err(reason) => {
                info!("Attempt {} rejected before submit: {:?}", attempt_id, reason);
                let mut session = self.session();
                if session.owns(attempt_id) {
                    session.state = WorkflowState::Failed(
                        AnalysisError::from(reason).to_failure(&self.service_url),
                    );
                }
                return Ok(session.snapshot());
            }
        };

        let cancel = CancellationToken::new();
        {
            let mut session = self.session();
            if !session.owns(attempt_id) {
                debug!("Attempt {} superseded during validation", attempt_id);
                return Ok(session.snapshot());
            }
            info!("Attempt {} submitting via {:?} path", attempt_id, request.path());
            session.state = WorkflowState::Submitting(PendingRequest {
                attempt_id,
                started_at: Utc::now(),
                request: request.clone(),
            });
            session.cancel = Some(cancel.clone());
        }

        let this = self.clone();
        let task = tokio::spawn(async move { this.run_attempt(attempt_id, request, cancel).await });

        match task.await {
            Ok(snapshot) => Ok(snapshot),
            Err(join_error) => {
                error!("Attempt {} task aborted: {}", attempt_id, join_error);
                Ok(self.settle(attempt_id, Err(TransportError::Cancelled.into())))
            }
        }
    }

    /// Back to `Idle` from anywhere. Cancels an in-flight request and
    /// discards the held input, result and error.
    pub fn reset(&self) -> WorkflowSnapshot {
        let mut session = self.session();
        if let Some(cancel) = session.cancel.take() {
            info!("Reset cancels the in-flight analysis");
            cancel.cancel();
        }
        session.state = WorkflowState::Idle;
        session.candidate = None;
        session.snapshot()
    }

    async fn run_attempt(
        &self,
        attempt_id: Uuid,
        request: AnalysisRequest,
        cancel: CancellationToken,
    ) -> WorkflowSnapshot {
        let outcome = match self.client.submit(&request, &cancel).await {
            Ok(raw) => normalize(&raw).map_err(AnalysisError::from),
            Err(err) => Err(AnalysisError::from(err)),
        };
        self.settle(attempt_id, outcome)
    }

    fn settle(
        &self,
        attempt_id: Uuid,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> WorkflowSnapshot {
        let mut session = self.session();
        if !session.owns(attempt_id) {
            debug!("Dropping outcome of superseded attempt {}", attempt_id);
            return session.snapshot();
        }

        session.cancel = None;
        session.state = match outcome {
            Ok(result) => {
                info!(
                    "Attempt {} succeeded: {} skills, {} recommendations",
                    attempt_id,
                    result.skills.all_skills.len(),
                    result.job_recommendations.len()
                );
                WorkflowState::Success(result)
            }
            Err(err) => {
                warn!("Attempt {} failed: {}", attempt_id, err);
                WorkflowState::Failed(err.to_failure(&self.service_url))
            }
        };
        session.snapshot()
    }
}
