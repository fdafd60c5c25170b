//! Immutable, load-once knowledge store.
//!
//! A [`KnowledgeStore`] is built once from a sequence of entries and never
//! changes afterwards. Insertion order is preserved and is the tie-break for
//! both matchers. Because nothing mutates after construction, a single
//! instance can be shared (`Arc<KnowledgeStore>`) by any number of
//! concurrent readers without synchronization.
//!
//! Construction normalizes the entries once so matching never repeats that
//! work per request:
//!
//! - keywords are lowercased and blank keywords are dropped,
//! - a blank category becomes [`DEFAULT_CATEGORY`],
//! - each normalized question gets a precomputed [`BigramProfile`].

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{CategoryCount, KnowledgeEntry, QuestionSummary, StoreStats, DEFAULT_CATEGORY};
use crate::normalize::normalize;
use crate::similarity::BigramProfile;

/// Dataset invariants violated while building a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate entry id: {0}")]
    DuplicateId(String),
    #[error("entry {0} has an empty id")]
    EmptyId(usize),
}

/// One entry plus the data derived from it at load time.
#[derive(Debug, Clone)]
pub(crate) struct IndexedEntry {
    pub(crate) entry: KnowledgeEntry,
    pub(crate) question_profile: BigramProfile,
}

/// Ordered, read-only collection of knowledge entries.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    entries: Vec<IndexedEntry>,
}

impl KnowledgeStore {
    /// Build a store from entries in dataset order.
    ///
    /// Fails if an id is empty or appears twice.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self, StoreError> {
        let mut seen: HashSet<String> = HashSet::with_capacity(entries.len());
        let mut indexed = Vec::with_capacity(entries.len());

        for (position, mut entry) in entries.into_iter().enumerate() {
            if entry.id.trim().is_empty() {
                return Err(StoreError::EmptyId(position));
            }
            if !seen.insert(entry.id.clone()) {
                return Err(StoreError::DuplicateId(entry.id));
            }

            let before = entry.keywords.len();
            entry.keywords = entry
                .keywords
                .iter()
                .filter(|k| !k.trim().is_empty())
                .map(|k| k.to_lowercase())
                .collect();
            if entry.keywords.len() != before {
                tracing::warn!(
                    id = %entry.id,
                    dropped = before - entry.keywords.len(),
                    "ignoring blank keywords"
                );
            }

            if entry.category.trim().is_empty() {
                entry.category = DEFAULT_CATEGORY.to_string();
            }

            let question_profile = BigramProfile::new(&normalize(&entry.question));
            indexed.push(IndexedEntry {
                entry,
                question_profile,
            });
        }

        Ok(Self { entries: indexed })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in store order.
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> + '_ {
        self.entries.iter().map(|ie| &ie.entry)
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries().find(|e| e.id == id)
    }

    pub(crate) fn indexed(&self) -> &[IndexedEntry] {
        &self.entries
    }

    /// Distinct categories, in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries()
            .filter(|&e| seen.insert(e.category.as_str()))
            .map(|e| e.category.clone())
            .collect()
    }

    /// Entries whose category equals `category` exactly, in store order.
    pub fn questions_for(&self, category: &str) -> Vec<QuestionSummary> {
        self.entries()
            .filter(|e| e.category == category)
            .map(|e| QuestionSummary {
                id: e.id.clone(),
                question: e.question.clone(),
                category: e.category.clone(),
            })
            .collect()
    }

    /// Entry and category totals with a per-category breakdown.
    pub fn stats(&self) -> StoreStats {
        let mut breakdown: Vec<CategoryCount> = Vec::new();
        for entry in self.entries() {
            match breakdown.iter_mut().find(|c| c.category == entry.category) {
                Some(c) => c.count += 1,
                None => breakdown.push(CategoryCount {
                    category: entry.category.clone(),
                    count: 1,
                }),
            }
        }

        StoreStats {
            total_questions: self.len(),
            total_categories: breakdown.len(),
            category_breakdown: breakdown,
        }
    }
}
