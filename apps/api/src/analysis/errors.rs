use serde::Serialize;
use thiserror::Error;

use crate::analysis_client::TransportError;
use crate::intake::validation::ValidationError;

/// The service answered but reported a logical failure, or answered with
/// something that cannot be read as a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub message: String,
}

/// Everything that can end an analysis attempt. None of these are fatal:
/// the workflow lands in `Failed` and can be reset or resubmitted.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    Transport,
    Service,
}

/// What the user sees after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl AnalysisError {
    /// Collapses the error into the message shown to the user.
    ///
    /// Transport failures get a connectivity message naming the service
    /// location so they read differently from a service-reported failure.
    pub fn to_failure(&self, service_url: &str) -> Failure {
        match self {
            AnalysisError::Validation(reason) => Failure {
                kind: FailureKind::Validation,
                message: reason.to_string(),
            },
            AnalysisError::Transport(_) => Failure {
                kind: FailureKind::Transport,
                message: format!(
                    "Failed to connect to the analysis service. Please make sure it is running at {service_url}."
                ),
            },
            AnalysisError::Service(err) => Failure {
                kind: FailureKind::Service,
                message: err.message.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_uses_rejection_message() {
        let failure = AnalysisError::from(ValidationError::Empty).to_failure("http://svc");
        assert_eq!(failure.kind, FailureKind::Validation);
        assert_eq!(failure.message, "Please enter your resume text.");
    }

    #[test]
    fn test_transport_and_service_failures_are_distinguishable() {
        let transport = AnalysisError::from(TransportError::Cancelled).to_failure("http://svc:5000");
        let service = AnalysisError::from(ServiceError {
            message: "Failed to analyze resume".to_string(),
        })
        .to_failure("http://svc:5000");

        assert_eq!(transport.kind, FailureKind::Transport);
        assert!(transport.message.contains("http://svc:5000"));
        assert_eq!(service.kind, FailureKind::Service);
        assert_ne!(transport.message, service.message);
    }
}
