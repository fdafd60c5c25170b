//! Canonical text form shared by queries and reference questions.

/// Lowercase the whole input and trim surrounding whitespace.
///
/// No Unicode folding, punctuation stripping, or tokenization. Must be
/// applied identically to the query and to every `question` so that
/// similarity scores stay comparable.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}
