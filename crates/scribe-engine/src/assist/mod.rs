//! Collaborators for AI-assisted editing.
//!
//! The core never performs inference. It hands the selected text to a
//! [`CompletionService`] supplied by the host and splices back whatever text
//! comes out. Failures are folded into a fixed message so that a broken
//! network never surfaces as a crash.

pub mod upload;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use upload::{ImageUploader, LocalFileUploader, UploadError, UploadResponse, UploadedFile};

/// Text shown in place of a completion when the service fails
pub const FALLBACK_MESSAGE: &str = "Error occurred while fetching response from AI.";

/// Body sent to the completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(rename = "user_input")]
    pub selected_text: String,
}

impl CompletionRequest {
    pub fn new(selected_text: impl Into<String>) -> Self {
        Self {
            selected_text: selected_text.into(),
        }
    }
}

/// Successful response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Completion service unreachable: {0}")]
    Unreachable(String),
    #[error("Completion service returned status {0}")]
    Status(u16),
    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),
    #[error("Completion request timed out")]
    Timeout,
}

/// Remote text-completion endpoint.
///
/// Implementations make exactly one network call per request and are not
/// cancelled once started.
#[async_trait(?Send)]
pub trait CompletionService {
    async fn complete(&self, request: &CompletionRequest)
    -> Result<CompletionResponse, ServiceError>;
}

/// Outcome of a completion call after failure recovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Completed(String),
    /// The service failed; carries [`FALLBACK_MESSAGE`]
    Fallback(String),
}

impl CompletionResult {
    pub fn text(&self) -> &str {
        match self {
            Self::Completed(text) | Self::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Call the service, converting any failure into the fallback message
pub async fn complete(
    service: &dyn CompletionService,
    request: &CompletionRequest,
) -> CompletionResult {
    match service.complete(request).await {
        Ok(response) => CompletionResult::Completed(response.content),
        Err(e) => {
            log::warn!("Error fetching response from AI: {e}");
            CompletionResult::Fallback(FALLBACK_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{FailingService, FixedService};

    #[test]
    fn test_request_wire_format() {
        let request = CompletionRequest::new("continue this");
        let json = serde_json::to_string(&request).unwrap();

        assert_eq!(json, r#"{"user_input":"continue this"}"#);
    }

    #[test]
    fn test_response_wire_format() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"content":"more text","model":"x"}"#).unwrap();

        assert_eq!(response.content, "more text");
    }

    #[test]
    fn test_complete_passes_content_through() {
        let service = FixedService::new("generated");

        let result = pollster::block_on(complete(&service, &CompletionRequest::new("prompt")));

        assert_eq!(result, CompletionResult::Completed("generated".to_string()));
        assert_eq!(service.requests(), vec!["prompt".to_string()]);
    }

    #[test]
    fn test_network_fault_becomes_fallback() {
        let service = FailingService::new(ServiceError::Unreachable("connection reset".into()));

        let result = pollster::block_on(complete(&service, &CompletionRequest::new("prompt")));

        assert!(result.is_fallback());
        assert_eq!(result.text(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_http_status_becomes_fallback() {
        let service = FailingService::new(ServiceError::Status(503));

        let result = pollster::block_on(complete(&service, &CompletionRequest::new("prompt")));

        assert_eq!(result, CompletionResult::Fallback(FALLBACK_MESSAGE.to_string()));
    }
}
