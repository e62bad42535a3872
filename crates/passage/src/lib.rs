//! # Passage
//!
//! **A document-grounded retrieval engine for question-answering
//! assistants.**
//!
//! Uploaded files are extracted to plain text, split into
//! sentence-respecting chunks, and indexed in a single human-inspectable
//! JSON file. At query time the retriever ranks chunks by lexical overlap
//! with the query, optionally restricted to a subset of documents; an
//! empty result is the caller's signal to fall back to the FAQ or a
//! general answer.
//!
//! ## Data Flow
//!
//! 1. The upload collaborator hands a file path to
//!    [`ingest::upload_document`].
//! 2. [`extract`] converts PDF, DOCX, or TXT bytes into plain text;
//!    failures degrade to empty text and the file is skipped.
//! 3. The store splits the text via the chunker and persists one record
//!    per chunk, keyed `{document_hash}_{position}`.
//! 4. [`search`](passage_core::search) ranks chunks against a query by
//!    distinct query-term presence.
//! 5. [`answer::AnswerEngine`] grounds a prompt in the retrieved chunks
//!    and falls back to [`faq::Faq`] and a fixed message when retrieval
//!    comes back empty.
//!
//! The web UI, session handling, and the actual language-model providers
//! live outside this crate; they talk to it through the maintenance API
//! and the [`answer::Generator`] seam.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`extract`] | PDF/DOCX/TXT text extraction with graceful degradation |
//! | [`json_store`] | Persisted JSON-file index implementing the store trait |
//! | [`ingest`] | Index maintenance: upload, delete, full reindex |
//! | [`faq`] | FAQ fallback lookup |
//! | [`answer`] | Prompt assembly over retrieval results and the generator seam |

pub mod answer;
pub mod config;
pub mod extract;
pub mod faq;
pub mod ingest;
pub mod json_store;

pub use json_store::JsonStore;
pub use passage_core::chunk;
pub use passage_core::models;
pub use passage_core::search;
pub use passage_core::store;
