//! Lexical retrieval over a [`Store`].
//!
//! Ranking is deliberately simple and explainable: a chunk's score is the
//! number of distinct query terms textually present in its lowercased
//! content. Ties keep index-insertion order (stable sort) rather than any
//! secondary relevance heuristic.
//!
//! An implementation substituting vector similarity must preserve the
//! contract: empty index and no-match yield an empty result (never an
//! error), document filtering is applied before scoring, and ordering is
//! deterministic for a fixed index state and query.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::ChunkRecord;
use crate::store::Store;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 3;

/// Inputs for a single retrieval invocation.
#[derive(Debug, Clone)]
pub struct SearchRequest<'a> {
    /// Query text; tokenized into lowercase alphanumeric runs.
    pub query: &'a str,
    /// Maximum number of chunks to return.
    pub top_k: usize,
    /// When set, only chunks whose `doc_path` is in this list are scored.
    pub allowed_doc_paths: Option<&'a [String]>,
}

impl<'a> SearchRequest<'a> {
    /// Request with the default `top_k` and no document filter.
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            top_k: DEFAULT_TOP_K,
            allowed_doc_paths: None,
        }
    }
}

/// A ranked retrieval hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub doc_path: String,
    pub doc_name: String,
    pub position: i64,
    pub content: String,
    /// Count of distinct query terms present in the chunk.
    pub score: usize,
}

/// Distinct lowercase alphanumeric runs of a query.
pub fn tokenize(query: &str) -> BTreeSet<String> {
    query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rank stored chunks against `req`, most relevant first.
///
/// An empty index, a query with no usable terms, a store read failure, or
/// no matching chunk all yield an empty vector — the caller's signal to
/// fall back to FAQ or general answering. Never an error.
pub fn search_hits<S: Store>(store: &S, req: &SearchRequest<'_>) -> Vec<SearchHit> {
    let terms = tokenize(req.query);
    if terms.is_empty() || req.top_k == 0 {
        return Vec::new();
    }

    let records = match store.load_chunks() {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("search degraded to empty results: {e:#}");
            return Vec::new();
        }
    };

    let mut hits: Vec<SearchHit> = records
        .into_iter()
        .filter(|record| match req.allowed_doc_paths {
            Some(allowed) => allowed.iter().any(|p| p == &record.doc_path),
            None => true,
        })
        .filter_map(|record| {
            let score = score_chunk(&record, &terms)?;
            Some(SearchHit {
                doc_path: record.doc_path,
                doc_name: record.doc_name,
                position: record.position,
                content: record.content,
                score,
            })
        })
        .collect();

    // Stable sort: equal scores keep index-insertion order.
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(req.top_k);
    hits
}

/// The retrieval contract surface: the text of the top-ranked chunks.
pub fn search<S: Store>(store: &S, req: &SearchRequest<'_>) -> Vec<String> {
    search_hits(store, req)
        .into_iter()
        .map(|hit| hit.content)
        .collect()
}

/// Term-presence score, or `None` when no query term occurs in the chunk.
fn score_chunk(record: &ChunkRecord, terms: &BTreeSet<String>) -> Option<usize> {
    let content = record.content.to_lowercase();
    let score = terms
        .iter()
        .filter(|term| content.contains(term.as_str()))
        .count();
    (score > 0).then_some(score)
}
