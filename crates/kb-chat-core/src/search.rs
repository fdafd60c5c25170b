//! Keyword and similarity matchers.
//!
//! Both matchers walk the store in its fixed order and return at most one
//! entry. They are composed by [`find_best_match`]:
//!
//! 1. **Keyword pass.** The first entry (in store order) with any keyword
//!    contained in the normalized query wins immediately. This is a priority
//!    pass, not a ranking: a keyword hit beats any similarity score, and with
//!    overlapping keywords the earlier entry wins even if a later one is more
//!    specific.
//! 2. **Similarity pass.** Only when no keyword matched. Each entry's
//!    question is scored with the bigram Dice coefficient. An entry becomes
//!    the best only if its score is strictly greater than the best so far
//!    *and* strictly greater than [`SIMILARITY_THRESHOLD`], so ties keep the
//!    earliest entry and a score of exactly `0.3` never matches.

use crate::models::{KnowledgeEntry, MatchMethod, MatchResult};
use crate::similarity::BigramProfile;
use crate::store::KnowledgeStore;

/// Minimum similarity (exclusive) for the fallback pass to accept an entry.
pub const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Return the first entry with a keyword that is a substring of
/// `normalized_query`.
pub fn match_by_keyword<'a>(
    store: &'a KnowledgeStore,
    normalized_query: &str,
) -> Option<&'a KnowledgeEntry> {
    store.entries().find(|entry| {
        entry
            .keywords
            .iter()
            .any(|keyword| normalized_query.contains(keyword.as_str()))
    })
}

/// Return the best entry by question similarity, with its score.
pub fn match_by_similarity<'a>(
    store: &'a KnowledgeStore,
    normalized_query: &str,
) -> Option<(&'a KnowledgeEntry, f64)> {
    let query_profile = BigramProfile::new(normalized_query);
    let scores = store
        .indexed()
        .iter()
        .map(|ie| query_profile.dice(&ie.question_profile));

    pick_best(scores).map(|(position, score)| (&store.indexed()[position].entry, score))
}

/// Apply the selection rule to scores given in store order.
///
/// Returns the position and score of the winner, or `None` when nothing
/// exceeds the threshold.
pub fn pick_best<I>(scores: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    let mut highest = 0.0;

    for (position, score) in scores.into_iter().enumerate() {
        if score > highest && score > SIMILARITY_THRESHOLD {
            highest = score;
            best = Some((position, score));
        }
    }

    best
}

/// Run the keyword pass, then the similarity pass if needed.
pub fn find_best_match<'a>(store: &'a KnowledgeStore, normalized_query: &str) -> MatchResult<'a> {
    if let Some(entry) = match_by_keyword(store, normalized_query) {
        return MatchResult::Matched {
            entry,
            method: MatchMethod::Keyword,
            score: None,
        };
    }

    match match_by_similarity(store, normalized_query) {
        Some((entry, score)) => MatchResult::Matched {
            entry,
            method: MatchMethod::Similarity,
            score: Some(score),
        },
        None => MatchResult::NoMatch,
    }
}
