//! Index maintenance: the operations the upload and delete collaborators
//! call.
//!
//! Upload runs extract → chunk → store. Extraction problems degrade to
//! empty text upstream, and empty text means "nothing to index", not an
//! error. Delete removes the document from the index before touching the
//! underlying file, so a failed removal cannot leave the index pointing
//! at a file that no longer exists.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use passage_core::store::Store;

use crate::extract::{extract, DocumentFormat};

/// Outcome of indexing one uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The document was split and indexed.
    Indexed { chunks: usize },
    /// Extraction produced no text; nothing was indexed.
    Skipped,
}

/// Extract `path` and index its text under the path as document identity.
pub fn upload_document<S: Store>(store: &S, path: &Path) -> Result<UploadOutcome> {
    let text = extract(path);
    if text.trim().is_empty() {
        tracing::debug!("no extractable text in {}, skipping", path.display());
        return Ok(UploadOutcome::Skipped);
    }
    let doc_path = path.to_string_lossy();
    let chunks = store
        .upsert_document(&doc_path, &text)
        .with_context(|| format!("failed to index {}", path.display()))?;
    Ok(UploadOutcome::Indexed { chunks })
}

/// Remove `path` from the index, then delete the file itself.
///
/// Index removal comes first: if it fails, the file stays put and the
/// caller can retry. A file already gone after successful removal is
/// fine. Returns the number of chunks removed.
pub fn delete_document<S: Store>(store: &S, path: &Path) -> Result<usize> {
    let doc_path = path.to_string_lossy();
    let removed = store
        .remove_document(&doc_path)
        .with_context(|| format!("failed to remove {} from the index", path.display()))?;
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("failed to delete {}", path.display()))
        }
    }
    Ok(removed)
}

/// Totals from a [`reindex_all`] sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Files indexed.
    pub indexed: usize,
    /// Supported files that produced no text.
    pub skipped: usize,
    /// Total chunks written.
    pub chunks: usize,
}

/// Re-ingest every supported file under `docs_dir`.
///
/// This is the recovery path after index corruption: the on-disk
/// documents are the source of truth and the index is rebuilt from them.
/// Files are visited in sorted order so the rebuilt index is
/// deterministic.
pub fn reindex_all<S: Store>(store: &S, docs_dir: &Path) -> Result<IngestSummary> {
    if !docs_dir.is_dir() {
        anyhow::bail!("documents directory does not exist: {}", docs_dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(docs_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if !DocumentFormat::from_path(entry.path()).is_supported() {
            tracing::debug!("skipping unsupported file {}", entry.path().display());
            continue;
        }
        files.push(entry.path().to_path_buf());
    }
    files.sort();

    let mut summary = IngestSummary::default();
    for path in files {
        match upload_document(store, &path)? {
            UploadOutcome::Indexed { chunks } => {
                summary.indexed += 1;
                summary.chunks += chunks;
            }
            UploadOutcome::Skipped => summary.skipped += 1,
        }
    }
    Ok(summary)
}
