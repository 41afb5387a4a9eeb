//! Reading source files into documents.

use anyhow::{Context, Result};
use drill_core::SourceDocument;
use std::fs;
use std::path::Path;

/// Read a file as a drill document named after the file.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn load_document(path: &Path) -> Result<SourceDocument> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let document = SourceDocument::parse(&content).with_name(name);
    tracing::info!(path = %path.display(), lines = document.len(), "loaded source file");
    Ok(document)
}
