pub mod assist;
pub mod editing;
pub mod export;
pub mod io;
pub mod models;
pub mod session;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use assist::{CompletionRequest, CompletionResponse, CompletionResult, CompletionService};
pub use editing::{
    EditError, LiveSelection, Patch, ResolvedSelection, SelectionAnchor, SpliceTarget, TextView,
    resolve_selection,
};
pub use export::{ExportArtifact, ExportError, ExportOptions, MarkupDocument, RenderOptions};
pub use io::{IoError, read_document, write_saved_data};
pub use models::{Block, BlockContent, BlockId, BlockKind, Document, ImageData, Snapshot};
pub use session::{AssistMode, AssistOutcome, BusyFlag, EditorSession};
