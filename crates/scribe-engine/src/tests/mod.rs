//! Shared fakes for unit tests

use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::assist::{CompletionRequest, CompletionResponse, CompletionService, ServiceError};
use crate::export::{ExportArtifact, ExportError, ExportOptions, MarkupDocument, Paginator};
use tempfile::TempDir;

/// Create a temporary directory for document files
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test file with content
pub fn create_test_file(dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}

/// Answers every request with the same text and records what it was asked
pub struct FixedService {
    reply: String,
    requests: RefCell<Vec<String>>,
}

impl FixedService {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl CompletionService for FixedService {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ServiceError> {
        self.requests
            .borrow_mut()
            .push(request.selected_text.clone());
        Ok(CompletionResponse {
            content: self.reply.clone(),
        })
    }
}

/// Fails every request with a copy of the configured error
pub struct FailingService {
    error: RefCell<Option<ServiceError>>,
    calls: Cell<usize>,
}

impl FailingService {
    pub fn new(error: ServiceError) -> Self {
        Self {
            error: RefCell::new(Some(error)),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl CompletionService for FailingService {
    async fn complete(
        &self,
        _request: &CompletionRequest,
    ) -> Result<CompletionResponse, ServiceError> {
        self.calls.set(self.calls.get() + 1);
        Err(self.error.borrow_mut().take().unwrap_or(ServiceError::Timeout))
    }
}

/// Paginator that returns the markup bytes as the artifact, or fails
pub struct FakePaginator {
    pub fail_with: Option<String>,
    pub calls: Cell<usize>,
}

impl FakePaginator {
    pub fn working() -> Self {
        Self {
            fail_with: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            calls: Cell::new(0),
        }
    }
}

#[async_trait(?Send)]
impl Paginator for FakePaginator {
    async fn paginate(
        &self,
        markup: &MarkupDocument,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        self.calls.set(self.calls.get() + 1);
        match &self.fail_with {
            Some(reason) => Err(ExportError::RenderFailure(reason.clone())),
            None => Ok(ExportArtifact::new(
                options.filename.clone(),
                markup.as_str().as_bytes().to_vec(),
            )),
        }
    }
}
