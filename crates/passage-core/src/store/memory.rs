//! In-memory [`Store`] implementation for tests.
//!
//! Keeps `(key, record)` pairs in insertion order behind a
//! `std::sync::RwLock`, mirroring the persisted store's ordered-map
//! semantics without touching the filesystem.

use std::sync::RwLock;

use anyhow::Result;

use crate::chunk::{split_text, DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP};
use crate::models::{chunk_key, document_hash, document_name, ChunkRecord};

use super::Store;

/// In-memory store for tests and embedding hosts without a filesystem.
pub struct InMemoryStore {
    chunk_size: usize,
    overlap: usize,
    entries: RwLock<Vec<(String, ChunkRecord)>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_chunking(DEFAULT_CHUNK_SIZE, DEFAULT_OVERLAP)
    }

    pub fn with_chunking(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for InMemoryStore {
    fn upsert_document(&self, doc_path: &str, full_text: &str) -> Result<usize> {
        let hash = document_hash(doc_path);
        let name = document_name(doc_path);
        let chunks = split_text(full_text, self.chunk_size, self.overlap);

        let prefix = format!("{}_", hash);
        let mut entries = self.entries.write().unwrap();
        entries.retain(|(key, _)| !key.starts_with(&prefix));
        for (i, content) in chunks.iter().enumerate() {
            let position = i as i64;
            entries.push((
                chunk_key(&hash, position),
                ChunkRecord {
                    doc_path: doc_path.to_string(),
                    doc_name: name.clone(),
                    content: content.clone(),
                    position,
                },
            ));
        }
        Ok(chunks.len())
    }

    fn remove_document(&self, doc_path: &str) -> Result<usize> {
        let prefix = format!("{}_", document_hash(doc_path));
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|(key, _)| !key.starts_with(&prefix));
        Ok(before - entries.len())
    }

    fn load_chunks(&self) -> Result<Vec<ChunkRecord>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.iter().map(|(_, record)| record.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_then_load() {
        let store = InMemoryStore::new();
        let written = store.upsert_document("docs/a.txt", "Hello world.").unwrap();
        assert_eq!(written, 1);

        let records = store.load_chunks().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].doc_path, "docs/a.txt");
        assert_eq!(records[0].doc_name, "a.txt");
        assert_eq!(records[0].position, 0);
    }

    #[test]
    fn test_upsert_replaces_previous_chunks() {
        let store = InMemoryStore::with_chunking(20, 5);
        store
            .upsert_document("docs/a.txt", "First part. Second part. Third part. Fourth part.")
            .unwrap();
        let long = store.load_chunks().unwrap().len();
        assert!(long > 1);

        // A shorter re-upload must leave no stale tail chunks.
        store.upsert_document("docs/a.txt", "Only part.").unwrap();
        let records = store.load_chunks().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content, "Only part.");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = InMemoryStore::new();
        store.upsert_document("docs/a.txt", "Hello world.").unwrap();

        assert_eq!(store.remove_document("docs/a.txt").unwrap(), 1);
        assert_eq!(store.remove_document("docs/a.txt").unwrap(), 0);
        assert!(store.load_chunks().unwrap().is_empty());
    }

    #[test]
    fn test_remove_leaves_other_documents_alone() {
        let store = InMemoryStore::new();
        store.upsert_document("docs/a.txt", "Alpha text.").unwrap();
        store.upsert_document("docs/b.txt", "Beta text.").unwrap();

        store.remove_document("docs/a.txt").unwrap();
        let records = store.load_chunks().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].doc_path, "docs/b.txt");
    }

    #[test]
    fn test_document_chunks_ordered_by_position() {
        let store = InMemoryStore::with_chunking(20, 5);
        store
            .upsert_document("docs/a.txt", "First part. Second part. Third part.")
            .unwrap();

        let chunks = store.document_chunks("docs/a.txt").unwrap();
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i as i64);
        }
    }
}
