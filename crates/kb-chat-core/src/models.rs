//! Core data models shared by the store, the matchers, and the composer.
//!
//! [`KnowledgeEntry`] is the only type that is deserialized from the
//! dataset. Everything else is produced per request or per view.

use serde::{Deserialize, Deserializer, Serialize};

/// Category assigned to entries whose dataset record has none.
pub const DEFAULT_CATEGORY: &str = "geral";

/// A single knowledge-base record.
///
/// Field names follow the English schema; the Portuguese names used by the
/// legacy support dataset (`pergunta`, `resposta`, `categoria`,
/// `topicos_relacionados`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    /// Opaque identifier, unique within a store. JSON strings and integers
    /// are both accepted and kept as their textual form.
    #[serde(deserialize_with = "id_from_scalar")]
    pub id: String,
    /// Reference text scored by the similarity matcher.
    #[serde(alias = "pergunta")]
    pub question: String,
    /// Text returned verbatim on a match.
    #[serde(alias = "resposta")]
    pub answer: String,
    /// `null` or absent means [`DEFAULT_CATEGORY`].
    #[serde(
        alias = "categoria",
        default = "default_category",
        deserialize_with = "category_or_default"
    )]
    pub category: String,
    /// Trigger substrings, lowercased when the store is built.
    #[serde(default, deserialize_with = "list_or_empty")]
    pub keywords: Vec<String>,
    #[serde(
        alias = "topicos_relacionados",
        default,
        deserialize_with = "list_or_empty"
    )]
    pub related_topics: Vec<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn category_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn id_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Uint(n) => n.to_string(),
    })
}

/// Which matcher produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMethod {
    Keyword,
    Similarity,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword => write!(f, "keyword"),
            Self::Similarity => write!(f, "similarity"),
        }
    }
}

/// Outcome of the matching pipeline for one query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    NoMatch,
    Matched {
        entry: &'a KnowledgeEntry,
        method: MatchMethod,
        /// Raw Dice score for similarity hits; `None` for keyword hits.
        score: Option<f64>,
    },
}

impl<'a> MatchResult<'a> {
    pub fn entry(&self) -> Option<&'a KnowledgeEntry> {
        match self {
            Self::NoMatch => None,
            Self::Matched { entry, .. } => Some(entry),
        }
    }

    pub fn method(&self) -> Option<MatchMethod> {
        match self {
            Self::NoMatch => None,
            Self::Matched { method, .. } => Some(*method),
        }
    }
}

/// The caller-facing reply to a query.
///
/// `confidence` is `1` on any match and `0` on the fallback. It is never
/// scaled by the similarity score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub reply: String,
    pub confidence: u8,
    pub category: String,
    pub related_topics: Vec<String>,
}

/// Projection of an entry used by the per-category question listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionSummary {
    pub id: String,
    pub question: String,
    pub category: String,
}

/// Number of entries in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub total_questions: usize,
    pub total_categories: usize,
    /// Per-category counts, in order of first appearance.
    pub category_breakdown: Vec<CategoryCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_portuguese_fields() {
        let raw = r#"{
            "id": 7,
            "pergunta": "Como instalar certificado A1?",
            "resposta": "Siga o passo 1...",
            "categoria": "certificado-a1",
            "keywords": ["certificado a1"],
            "topicos_relacionados": ["Windows", "Mac"]
        }"#;
        let entry: KnowledgeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, "7");
        assert_eq!(entry.question, "Como instalar certificado A1?");
        assert_eq!(entry.answer, "Siga o passo 1...");
        assert_eq!(entry.category, "certificado-a1");
        assert_eq!(entry.related_topics, vec!["Windows", "Mac"]);
    }

    #[test]
    fn test_deserialize_defaults() {
        let raw = r#"{"id": "faq-1", "question": "q", "answer": "a"}"#;
        let entry: KnowledgeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.id, "faq-1");
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert!(entry.keywords.is_empty());
        assert!(entry.related_topics.is_empty());
    }

    #[test]
    fn test_deserialize_null_fields_as_defaults() {
        let raw = r#"{
            "id": 1,
            "pergunta": "p",
            "resposta": "r",
            "categoria": null,
            "keywords": null,
            "topicos_relacionados": null
        }"#;
        let entry: KnowledgeEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.category, DEFAULT_CATEGORY);
        assert!(entry.keywords.is_empty());
        assert!(entry.related_topics.is_empty());
    }

    #[test]
    fn test_id_rejects_non_scalar() {
        let raw = r#"{"id": [1], "question": "q", "answer": "a"}"#;
        assert!(serde_json::from_str::<KnowledgeEntry>(raw).is_err());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = Response {
            reply: "ok".to_string(),
            confidence: 1,
            category: "pje".to_string(),
            related_topics: vec!["Projudi".to_string()],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["relatedTopics"][0], "Projudi");
        assert_eq!(json["confidence"], 1);
    }
}
