//! Export pipeline: block model → styled markup → paginated artifact.
//!
//! [`render`] is a pure function of document content. Pagination is
//! delegated to a [`Paginator`] back end; this crate's responsibility ends at
//! handing it well-formed markup and an [`ExportOptions`].

pub mod markup;
pub mod options;
pub mod paginate;

pub use markup::{
    MarkupDocument, RenderOptions, TextEscaping, clamp_heading_level, render, render_blocks,
    render_body,
};
pub use options::{ExportOptions, ImageFormat, Orientation, PageFormat, PageUnit};
pub use paginate::{CommandPaginator, ExportArtifact, Paginator, RendererCommand, paginate};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid export options: {0}")]
    InvalidOptions(String),
    #[error("Render failed: {0}")]
    RenderFailure(String),
}
