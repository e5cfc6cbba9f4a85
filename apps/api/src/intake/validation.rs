//! Input validation for résumé intake.
//!
//! Pure and synchronous. The UI calls it on every edit for inline feedback,
//! and the workflow calls it once more at submit time.

use serde::Serialize;
use thiserror::Error;

use crate::models::input::CandidateInput;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";

const ACCEPTED_MIME_TYPES: &[&str] = &[MIME_PDF, MIME_TEXT];

/// 16 MiB.
pub const MAX_FILE_BYTES: u64 = 16 * 1024 * 1024;

/// Why a candidate input was refused before any network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Please upload a PDF or TXT file.")]
    UnsupportedType,

    #[error("File size must be less than 16MB.")]
    TooLarge,

    #[error("Please enter your resume text.")]
    Empty,

    /// File mode with nothing selected.
    #[error("Please select a PDF or TXT file.")]
    NoFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(CandidateInput),
    Rejected(ValidationError),
}

#[cfg(test)]
impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    pub fn rejection(&self) -> Option<ValidationError> {
        match self {
            ValidationOutcome::Valid(_) => None,
            ValidationOutcome::Rejected(reason) => Some(*reason),
        }
    }
}

/// Validates a candidate input.
///
/// Files: MIME type first, then size. Only the upper bound is enforced, so
/// a zero-byte file of an accepted type is valid.
/// Text: trimmed content must be non-empty.
pub fn validate(input: CandidateInput) -> ValidationOutcome {
    match check(&input) {
        Ok(()) => ValidationOutcome::Valid(input),
        Err(reason) => ValidationOutcome::Rejected(reason),
    }
}

/// Same rules as [`validate`] without taking ownership of the input.
pub fn check(input: &CandidateInput) -> Result<(), ValidationError> {
    match input {
        CandidateInput::File(file) => {
            if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
                return Err(ValidationError::UnsupportedType);
            }
            if file.size_bytes > MAX_FILE_BYTES {
                return Err(ValidationError::TooLarge);
            }
            Ok(())
        }
        CandidateInput::Text(text) => {
            if text.content.trim().is_empty() {
                Err(ValidationError::Empty)
            } else {
                Ok(())
            }
        }
    }
}

/// Maps an accepted file extension to its MIME type.
///
/// Browsers sometimes send uploads as `application/octet-stream` or with no
/// content type at all; the upload route falls back to this.
pub fn mime_for_filename(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(MIME_PDF)
    } else if lower.ends_with(".txt") {
        Some(MIME_TEXT)
    } else {
        None
    }
}
