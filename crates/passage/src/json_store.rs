//! JSON-file [`Store`] implementation — the persisted index.
//!
//! The entire index is one JSON object keyed `{document_hash}_{position}`,
//! kept human-inspectable on disk:
//!
//! ```json
//! { "<doc_hash>_<position>": {
//!     "doc_path": "...", "doc_name": "...",
//!     "content": "...", "position": 0
//! } }
//! ```
//!
//! Every mutation is a full read-modify-persist cycle: parse the file,
//! mutate the ordered map in memory, write a temp file alongside it, and
//! rename over the original so a crashed write never leaves a torn index.
//! Key order in the file is insertion order (`serde_json/preserve_order`),
//! which keeps the retriever's insertion-order tie-break stable across
//! process restarts.
//!
//! A missing file is an empty index. An unreadable or malformed file is
//! treated as empty with a loud diagnostic — re-ingestion recovers — but a
//! genuine read I/O error fails the requested mutation rather than
//! silently clobbering whatever is on disk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use passage_core::chunk::split_text;
use passage_core::models::{chunk_key, document_hash, document_name, ChunkRecord};
use passage_core::store::Store;

/// Persisted JSON-file index.
pub struct JsonStore {
    index_path: PathBuf,
    chunk_size: usize,
    overlap: usize,
}

impl JsonStore {
    pub fn new(index_path: impl Into<PathBuf>, chunk_size: usize, overlap: usize) -> Self {
        Self {
            index_path: index_path.into(),
            chunk_size,
            overlap,
        }
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Parse the index file: missing means empty, malformed means empty
    /// with a diagnostic, a real read error is the caller's failure.
    fn load_index(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.index_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read index {}", self.index_path.display())
                })
            }
        };
        match serde_json::from_str::<Map<String, Value>>(&raw) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    "index {} is corrupt, treating as empty: {}",
                    self.index_path.display(),
                    e
                );
                Ok(Map::new())
            }
        }
    }

    /// Atomically replace the index file with `map`.
    fn persist_index(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.index_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let serialized =
            serde_json::to_string_pretty(map).context("failed to serialize index")?;
        let tmp_path = self.index_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, serialized)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.index_path)
            .with_context(|| format!("failed to replace {}", self.index_path.display()))?;
        Ok(())
    }
}

impl Store for JsonStore {
    fn upsert_document(&self, doc_path: &str, full_text: &str) -> Result<usize> {
        let hash = document_hash(doc_path);
        let name = document_name(doc_path);
        let chunks = split_text(full_text, self.chunk_size, self.overlap);

        let mut map = self.load_index()?;
        remove_namespace(&mut map, &hash);
        for (i, content) in chunks.iter().enumerate() {
            let position = i as i64;
            let record = ChunkRecord {
                doc_path: doc_path.to_string(),
                doc_name: name.clone(),
                content: content.clone(),
                position,
            };
            let value =
                serde_json::to_value(&record).context("failed to encode chunk record")?;
            map.insert(chunk_key(&hash, position), value);
        }
        self.persist_index(&map)?;
        Ok(chunks.len())
    }

    fn remove_document(&self, doc_path: &str) -> Result<usize> {
        let hash = document_hash(doc_path);
        let mut map = self.load_index()?;
        let removed = remove_namespace(&mut map, &hash);
        if removed > 0 {
            self.persist_index(&map)?;
        }
        Ok(removed)
    }

    fn load_chunks(&self) -> Result<Vec<ChunkRecord>> {
        let map = self.load_index()?;
        let mut records = Vec::with_capacity(map.len());
        for (key, value) in &map {
            match serde_json::from_value::<ChunkRecord>(value.clone()) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "index entry {} is malformed, treating index as empty: {}",
                        key,
                        e
                    );
                    return Ok(Vec::new());
                }
            }
        }
        Ok(records)
    }
}

/// Delete every key under a document hash. `shift_remove` keeps the
/// surviving keys in insertion order.
fn remove_namespace(map: &mut Map<String, Value>, doc_hash: &str) -> usize {
    let prefix = format!("{}_", doc_hash);
    let stale: Vec<String> = map
        .keys()
        .filter(|key| key.starts_with(&prefix))
        .cloned()
        .collect();
    for key in &stale {
        map.shift_remove(key);
    }
    stale.len()
}
