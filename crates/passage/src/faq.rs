//! FAQ fallback lookup.
//!
//! Loaded from a JSON object of question → answer pairs. Lookup returns
//! the first entry whose question occurs, case-insensitively, inside the
//! query. Entries are matched in file order, so the result is
//! deterministic for a given file.

use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct Faq {
    entries: Vec<(String, String)>,
}

impl Faq {
    /// An FAQ that never matches.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read FAQ file: {}", path.display()))?;
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse FAQ file: {}", path.display()))?;
        let entries = map
            .into_iter()
            .filter_map(|(question, answer)| {
                answer.as_str().map(|a| (question, a.to_string()))
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First answer whose question appears inside `query`, ignoring case.
    pub fn lookup(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .find(|(question, _)| query.contains(&question.to_lowercase()))
            .map(|(_, answer)| answer.as_str())
    }
}
