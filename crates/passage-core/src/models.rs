//! Core data models used throughout Passage.
//!
//! A document is identified by its caller-assigned storage path; a stable
//! content hash of that path namespaces the document's chunks in the index.
//! [`ChunkRecord`] serializes to exactly the persisted index schema.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// A single indexed chunk, as persisted in the index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Storage path of the owning document (caller-assigned, stable).
    pub doc_path: String,
    /// Display name of the owning document (final path component).
    pub doc_name: String,
    /// The chunk text.
    pub content: String,
    /// Zero-based position within the owning document.
    pub position: i64,
}

/// Stable identifier for a document, used to namespace its chunks.
///
/// SHA-256 of the path string, lowercase hex. Two documents share a
/// namespace only if they share a path.
pub fn document_hash(doc_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(doc_path.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Index key for the chunk at `position` of the document with `doc_hash`.
pub fn chunk_key(doc_hash: &str, position: i64) -> String {
    format!("{}_{}", doc_hash, position)
}

/// Display name for a document path: its final component, or the path
/// itself when there is none.
pub fn document_name(doc_path: &str) -> String {
    Path::new(doc_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| doc_path.to_string())
}
