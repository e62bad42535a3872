//! Answer assembly over retrieval results.
//!
//! The language model behind [`Generator`] is a black box: the engine
//! builds a context-grounded prompt from the retrieved chunks and hands
//! it over. When retrieval comes back empty it falls back to the FAQ,
//! and past that to a fixed message, so the caller always has something
//! to show. Which provider implements [`Generator`] is invisible here.

use anyhow::Result;

use passage_core::search::{search_hits, SearchHit, SearchRequest};
use passage_core::store::Store;

use crate::faq::Faq;

/// Message returned when neither the index nor the FAQ can help.
pub const NO_ANSWER_MESSAGE: &str = "Sorry, no relevant document or FAQ entry found.";

/// Black-box text generation capability. Provider-specific
/// implementations live outside this crate; tests use a canned mock.
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Where an [`Answer`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// Generated from retrieved document context.
    Documents,
    /// Served from the FAQ file.
    Faq,
    /// The fixed no-answer fallback.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// Build the grounding prompt handed to the generator.
pub fn compose_prompt(hits: &[SearchHit], query: &str) -> String {
    let context = hits
        .iter()
        .map(|hit| hit.content.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    format!("Context:\n{}\n\nQuestion: {}", context, query)
}

/// Retrieval-grounded answering with FAQ and fixed-message fallbacks.
pub struct AnswerEngine<'a, S: Store, G: Generator> {
    store: &'a S,
    generator: &'a G,
    faq: Faq,
    top_k: usize,
}

impl<'a, S: Store, G: Generator> AnswerEngine<'a, S, G> {
    pub fn new(store: &'a S, generator: &'a G, faq: Faq, top_k: usize) -> Self {
        Self {
            store,
            generator,
            faq,
            top_k,
        }
    }

    /// Answer `query`, optionally restricted to a set of document paths.
    ///
    /// Generator failures propagate; retrieval and FAQ problems do not —
    /// they fall through to the next stage of the chain.
    pub fn answer(&self, query: &str, allowed_doc_paths: Option<&[String]>) -> Result<Answer> {
        let req = SearchRequest {
            query,
            top_k: self.top_k,
            allowed_doc_paths,
        };
        let hits = search_hits(self.store, &req);
        if !hits.is_empty() {
            let prompt = compose_prompt(&hits, query);
            let text = self.generator.generate(&prompt)?;
            return Ok(Answer {
                text,
                source: AnswerSource::Documents,
            });
        }

        if let Some(entry) = self.faq.lookup(query) {
            return Ok(Answer {
                text: entry.to_string(),
                source: AnswerSource::Faq,
            });
        }

        Ok(Answer {
            text: NO_ANSWER_MESSAGE.to_string(),
            source: AnswerSource::Fallback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_core::store::memory::InMemoryStore;
    use std::cell::RefCell;

    /// Test generator that records the prompt it was handed.
    struct RecordingGenerator {
        reply: &'static str,
        last_prompt: RefCell<Option<String>>,
    }

    impl RecordingGenerator {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                last_prompt: RefCell::new(None),
            }
        }
    }

    impl Generator for RecordingGenerator {
        fn generate(&self, prompt: &str) -> Result<String> {
            *self.last_prompt.borrow_mut() = Some(prompt.to_string());
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_grounded_answer_uses_retrieved_context() {
        let store = InMemoryStore::new();
        store
            .upsert_document("docs/billing.txt", "Refunds take 5 business days.")
            .unwrap();
        let generator = RecordingGenerator::new("Refunds take about a week.");
        let engine = AnswerEngine::new(&store, &generator, Faq::empty(), 3);

        let answer = engine.answer("refund timing", None).unwrap();
        assert_eq!(answer.source, AnswerSource::Documents);
        assert_eq!(answer.text, "Refunds take about a week.");

        let prompt = generator.last_prompt.borrow().clone().unwrap();
        assert!(prompt.starts_with("Context:\n"));
        assert!(prompt.contains("Refunds take 5 business days."));
        assert!(prompt.ends_with("Question: refund timing"));
    }

    #[test]
    fn test_empty_retrieval_falls_back_to_faq() {
        let tmp = tempfile::TempDir::new().unwrap();
        let faq_path = tmp.path().join("faq.json");
        std::fs::write(&faq_path, r#"{"opening hours": "We open at nine."}"#).unwrap();

        let store = InMemoryStore::new();
        let generator = RecordingGenerator::new("unused");
        let engine = AnswerEngine::new(&store, &generator, Faq::load(&faq_path).unwrap(), 3);

        let answer = engine.answer("what are your opening hours?", None).unwrap();
        assert_eq!(answer.source, AnswerSource::Faq);
        assert_eq!(answer.text, "We open at nine.");
        assert!(generator.last_prompt.borrow().is_none());
    }

    #[test]
    fn test_no_match_anywhere_yields_fixed_message() {
        let store = InMemoryStore::new();
        let generator = RecordingGenerator::new("unused");
        let engine = AnswerEngine::new(&store, &generator, Faq::empty(), 3);

        let answer = engine.answer("completely unknown topic", None).unwrap();
        assert_eq!(answer.source, AnswerSource::Fallback);
        assert_eq!(answer.text, NO_ANSWER_MESSAGE);
    }

    #[test]
    fn test_document_filter_reaches_retrieval() {
        let store = InMemoryStore::new();
        store.upsert_document("docs/a.txt", "Shared topic in A.").unwrap();
        store.upsert_document("docs/b.txt", "Shared topic in B.").unwrap();
        let generator = RecordingGenerator::new("ok");
        let engine = AnswerEngine::new(&store, &generator, Faq::empty(), 3);

        let allowed = vec!["docs/b.txt".to_string()];
        engine.answer("shared topic", Some(&allowed)).unwrap();

        let prompt = generator.last_prompt.borrow().clone().unwrap();
        assert!(prompt.contains("Shared topic in B."));
        assert!(!prompt.contains("Shared topic in A."));
    }
}
