//! Storage abstraction for Passage.
//!
//! The [`Store`] trait defines the index operations needed by the
//! ingestion and retrieval pipeline, enabling pluggable backends (the
//! persisted JSON-file store, in-memory for tests).
//!
//! Implementations must be `Send + Sync`. All operations are synchronous
//! and blocking: every mutation is a full read-modify-persist cycle over
//! the index. If independent processes race, the last writer's snapshot
//! wins; callers needing multi-writer safety must add external locking
//! around the whole cycle.

pub mod memory;

use anyhow::Result;

use crate::models::ChunkRecord;

/// Abstract index backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert_document`](Store::upsert_document) | Replace a document's chunks with a fresh split of its text |
/// | [`remove_document`](Store::remove_document) | Delete all chunks belonging to a document |
/// | [`load_chunks`](Store::load_chunks) | All records in index-insertion order |
/// | [`document_chunks`](Store::document_chunks) | One document's records in position order |
pub trait Store: Send + Sync {
    /// Split `full_text` and replace the document's chunks with the result.
    ///
    /// Any chunks already indexed under the document's hash are cleared
    /// first, so re-uploading a shorter version leaves no stale tail.
    /// Returns the number of chunks written.
    fn upsert_document(&self, doc_path: &str, full_text: &str) -> Result<usize>;

    /// Delete every chunk belonging to `doc_path`.
    ///
    /// Removing a document with no indexed chunks is a no-op, not an
    /// error. Returns the number of chunks removed.
    fn remove_document(&self, doc_path: &str) -> Result<usize>;

    /// All chunk records, in index-insertion order.
    fn load_chunks(&self) -> Result<Vec<ChunkRecord>>;

    /// One document's chunk records, ordered by position.
    fn document_chunks(&self, doc_path: &str) -> Result<Vec<ChunkRecord>> {
        let mut chunks: Vec<ChunkRecord> = self
            .load_chunks()?
            .into_iter()
            .filter(|c| c.doc_path == doc_path)
            .collect();
        chunks.sort_by_key(|c| c.position);
        Ok(chunks)
    }
}
