use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use crate::assist::{self, CompletionResult, CompletionService};
use crate::editing::{
    EditError, LiveSelection, Patch, ResolvedSelection, SpliceTarget, resolve_selection,
};
use crate::export::{
    self, ExportArtifact, ExportError, ExportOptions, MarkupDocument, Paginator, RenderOptions,
};
use crate::models::Document;

/// Shared "request in flight" indicator.
///
/// Clones observe the same flag, so the UI host can keep one to disable
/// its triggers while the session works.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag until the returned guard is dropped
    pub fn acquire(&self) -> BusyGuard {
        if self.0.swap(true, Ordering::SeqCst) {
            log::debug!("Busy flag raised while already set");
        }
        BusyGuard { flag: self.clone() }
    }
}

/// Clears its [`BusyFlag`] when dropped, whichever way the scope exits
#[derive(Debug)]
pub struct BusyGuard {
    flag: BusyFlag,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.flag.0.store(false, Ordering::SeqCst);
    }
}

/// Where a completion lands relative to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistMode {
    /// Replace the highlighted text
    #[default]
    Replace,
    /// Keep the highlighted text and insert after it
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistOutcome {
    pub completion: CompletionResult,
    /// `None` when the service failed and the document was left alone
    pub patch: Option<Patch>,
}

/// One editing session: the document plus the state the host needs around
/// it. Constructed by the host on mount and dropped on unmount.
#[derive(Debug, Default)]
pub struct EditorSession {
    document: Document,
    busy: BusyFlag,
    mode: AssistMode,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: AssistMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// For structural edits owned by the host (adding blocks, images)
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn mode(&self) -> AssistMode {
        self.mode
    }

    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn resolve(&self, selection: &LiveSelection) -> Result<ResolvedSelection, EditError> {
        resolve_selection(&self.document, selection)
    }

    pub fn splice(&mut self, target: &SpliceTarget, text: &str) -> Result<Patch, EditError> {
        self.document.splice(target, text)
    }

    /// Ask the completion service about the highlighted text and splice the
    /// answer back.
    ///
    /// The selection is resolved before the call and that anchor is the one
    /// used afterwards. A blank selection fails with
    /// [`EditError::EmptySelection`] without calling the service. A service
    /// failure yields the fallback message with the document untouched.
    pub async fn request_completion(
        &mut self,
        selection: &LiveSelection,
        service: &dyn CompletionService,
    ) -> Result<AssistOutcome, EditError> {
        let resolved = self
            .resolve(selection)
            .inspect_err(|e| log::info!("Not requesting completion: {e}"))?;
        let target = match self.mode {
            AssistMode::Replace => resolved.target,
            AssistMode::Continue => resolved.continuation_point(),
        };

        let completion = {
            let _busy = self.busy.acquire();
            assist::complete(service, &resolved.request()).await
        };

        let patch = match &completion {
            CompletionResult::Completed(text) => Some(self.document.splice(&target, text)?),
            CompletionResult::Fallback(_) => None,
        };

        Ok(AssistOutcome { completion, patch })
    }

    pub fn render(&self, options: &RenderOptions) -> MarkupDocument {
        export::render(&self.document, options)
    }

    /// Render the current snapshot and paginate it
    pub async fn export(
        &self,
        paginator: &dyn Paginator,
        options: &ExportOptions,
        render_options: &RenderOptions,
    ) -> Result<ExportArtifact, ExportError> {
        let markup = self.render(render_options);
        let _busy = self.busy.acquire();
        export::paginate(paginator, &markup, options).await
    }
}
