/// Analysis client — the only code in JobIntel that talks to the external
/// résumé analysis service.
///
/// One attempt per call, no retry. The client never interprets the HTTP
/// status or the `success`/`error` fields of the body: any decodable JSON is
/// handed back raw for `analysis::normalizer` to judge.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::intake::validation::{ValidationError, ValidationOutcome};
use crate::models::input::CandidateInput;

const UPLOAD_ENDPOINT: &str = "/upload";
const ANALYZE_TEXT_ENDPOINT: &str = "/analyze_text";
const FILE_FIELD: &str = "file";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request was cancelled")]
    Cancelled,
}

/// Which producer issued a request. Only affects the default failure
/// message; both paths share one normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestPath {
    File,
    Text,
}

impl RequestPath {
    pub fn default_failure_message(self) -> &'static str {
        match self {
            RequestPath::File => "Failed to analyze resume",
            RequestPath::Text => "Failed to analyze resume text",
        }
    }
}

/// A validated input encoded for the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisRequest {
    MultipartFile {
        bytes: Bytes,
        filename: String,
        mime_type: String,
    },
    JsonText {
        text: String,
    },
}

impl AnalysisRequest {
    pub fn path(&self) -> RequestPath {
        match self {
            AnalysisRequest::MultipartFile { .. } => RequestPath::File,
            AnalysisRequest::JsonText { .. } => RequestPath::Text,
        }
    }
}

/// Requests can only be built from a `Valid` outcome.
impl TryFrom<ValidationOutcome> for AnalysisRequest {
    type Error = ValidationError;

    fn try_from(outcome: ValidationOutcome) -> Result<Self, Self::Error> {
        match outcome {
            ValidationOutcome::Rejected(reason) => Err(reason),
            ValidationOutcome::Valid(CandidateInput::File(file)) => {
                Ok(AnalysisRequest::MultipartFile {
                    bytes: file.bytes,
                    filename: file.name,
                    mime_type: file.mime_type,
                })
            }
            // The text is sent as typed; trimming only decides validity.
            ValidationOutcome::Valid(CandidateInput::Text(text)) => Ok(AnalysisRequest::JsonText {
                text: text.content,
            }),
        }
    }
}

/// Decoded service body, tagged with the producer that fetched it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawServiceResponse {
    pub path: RequestPath,
    pub body: Value,
}

#[derive(Debug, Serialize)]
struct TextAnalysisBody<'a> {
    text: &'a str,
}

/// Seam between the workflow and the network.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Issues one request. Resolves to `TransportError::Cancelled` once
    /// `cancel` fires.
    async fn submit(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<RawServiceResponse, TransportError>;
}

/// reqwest-backed client for the analysis service.
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
}

impl HttpAnalysisClient {
    /// `timeout` is applied to the whole request; `None` waits indefinitely.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<RawServiceResponse, TransportError> {
        let builder = match request {
            AnalysisRequest::MultipartFile {
                bytes,
                filename,
                mime_type,
            } => {
                let url = self.endpoint(UPLOAD_ENDPOINT);
                info!("Uploading {} ({} bytes) to {}", filename, bytes.len(), url);

                let part = Part::bytes(bytes.to_vec())
                    .file_name(filename.clone())
                    .mime_str(mime_type)?;
                self.client
                    .post(url)
                    .multipart(Form::new().part(FILE_FIELD, part))
            }
            AnalysisRequest::JsonText { text } => {
                let url = self.endpoint(ANALYZE_TEXT_ENDPOINT);
                info!("Sending {} characters of resume text to {}", text.chars().count(), url);

                self.client.post(url).json(&TextAnalysisBody { text })
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            warn!("Analysis service returned {}; passing body through", status);
        }
        debug!("Analysis service response: status={}, bytes={}", status, body.len());

        let body: Value = serde_json::from_slice(&body)?;

        Ok(RawServiceResponse {
            path: request.path(),
            body,
        })
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn submit(
        &self,
        request: &AnalysisRequest,
        cancel: &CancellationToken,
    ) -> Result<RawServiceResponse, TransportError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Analysis request cancelled");
                Err(TransportError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }
}
