//! # kb-chat Core
//!
//! Transport-agnostic matching logic for the kb-chat support bot: data
//! models, the immutable knowledge store, query validation and
//! normalization, keyword and bigram-similarity matching, and response
//! composition.
//!
//! This crate contains no tokio, axum, filesystem I/O, or other
//! runtime dependencies. Loading the dataset from disk is the caller's job.
//!
//! ```text
//! validate → normalize → keyword match ─hit──────────────┐
//!                             │ miss                      ▼
//!                             └─▶ similarity match ─▶ compose → Response
//! ```

pub mod compose;
pub mod engine;
pub mod models;
pub mod normalize;
pub mod search;
pub mod similarity;
pub mod store;
pub mod validate;

pub use engine::{Answer, MatchEngine};
pub use models::{KnowledgeEntry, MatchMethod, MatchResult, Response};
pub use store::{KnowledgeStore, StoreError};
pub use validate::{InvalidQuery, InvalidQueryReason, QueryInput};
