pub mod markdown;
pub mod saved_data;

pub use markdown::parse_markdown;
pub use saved_data::{
    SavedBlock, SavedData, from_saved_data, parse_saved_data, saved_data_to_string,
    to_saved_data,
};

use crate::models::Document;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid saved data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {kind} block at index {index}: {source}")]
    InvalidBlock {
        index: usize,
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// How a document file is stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    SavedData,
    Markdown,
}

impl DocumentFormat {
    /// `.json` files hold saved editor data; anything else is read as Markdown
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::SavedData,
            _ => Self::Markdown,
        }
    }
}

/// Read a text file and return its content
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(path, content).map_err(IoError::Io)
}

/// Load a document, picking the format from the file extension
pub fn read_document(path: &Path) -> Result<Document, IoError> {
    let content = read_file(path)?;
    let doc = match DocumentFormat::from_path(path) {
        DocumentFormat::SavedData => parse_saved_data(&content)?,
        DocumentFormat::Markdown => parse_markdown(&content),
    };
    log::debug!("Read {} blocks from {}", doc.len(), path.display());
    Ok(doc)
}

pub fn write_saved_data(path: &Path, doc: &Document) -> Result<(), IoError> {
    write_file(path, &saved_data_to_string(doc)?)
}
