//! The query-answering entry point.
//!
//! [`MatchEngine`] holds a shared reference to the immutable store and runs
//! the full pipeline for each query:
//!
//! ```text
//! validate → normalize → keyword pass → similarity pass → compose
//! ```
//!
//! Every step is synchronous and side-effect free, so one engine can serve
//! any number of concurrent callers. The same query against the same store
//! always yields the same [`Response`].

use std::sync::Arc;

use serde::Serialize;

use crate::compose::compose;
use crate::models::{MatchMethod, MatchResult, QuestionSummary, Response, StoreStats};
use crate::normalize::normalize;
use crate::search::find_best_match;
use crate::store::KnowledgeStore;
use crate::validate::{validate, InvalidQuery, QueryInput};

/// A [`Response`] together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub response: Response,
    pub explain: MatchExplanation,
}

/// Diagnostic detail for one answered query. Not part of the public
/// `confidence` contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchExplanation {
    /// The query after normalization.
    pub normalized_query: String,
    /// `None` when the fallback was used.
    pub method: Option<MatchMethod>,
    pub entry_id: Option<String>,
    /// Raw Dice score, only for similarity matches.
    pub score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    store: Arc<KnowledgeStore>,
}

impl MatchEngine {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Validate, match, and compose a response for a raw query.
    pub fn answer<'q>(&self, input: impl Into<QueryInput<'q>>) -> Result<Response, InvalidQuery> {
        self.answer_explained(input).map(|a| a.response)
    }

    /// Like [`answer`](Self::answer), also reporting the matcher and score.
    pub fn answer_explained<'q>(
        &self,
        input: impl Into<QueryInput<'q>>,
    ) -> Result<Answer, InvalidQuery> {
        let text = validate(input.into())?;
        let normalized_query = normalize(text);
        let result = find_best_match(&self.store, &normalized_query);

        let (method, entry_id, score) = match &result {
            MatchResult::Matched {
                entry,
                method,
                score,
            } => {
                tracing::debug!(
                    entry_id = %entry.id,
                    method = %method,
                    score = ?score,
                    "knowledge entry matched"
                );
                (Some(*method), Some(entry.id.clone()), *score)
            }
            MatchResult::NoMatch => {
                tracing::debug!("no knowledge entry matched, using fallback");
                (None, None, None)
            }
        };

        Ok(Answer {
            response: compose(&result),
            explain: MatchExplanation {
                normalized_query,
                method,
                entry_id,
                score,
            },
        })
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        self.store.categories()
    }

    pub fn questions_for(&self, category: &str) -> Vec<QuestionSummary> {
        self.store.questions_for(category)
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::FALLBACK_CATEGORY;
    use crate::models::KnowledgeEntry;
    use crate::validate::InvalidQueryReason;

    fn kb_entry(
        id: &str,
        category: &str,
        question: &str,
        answer: &str,
        keywords: &[&str],
    ) -> KnowledgeEntry {
        KnowledgeEntry {
            id: id.to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            related_topics: vec![format!("topic {}", id)],
        }
    }

    fn support_engine() -> MatchEngine {
        let store = KnowledgeStore::from_entries(vec![
            kb_entry(
                "1",
                "certificado-a1",
                "como instalar certificado a1",
                "Siga o passo 1...",
                &["certificado a1"],
            ),
            kb_entry(
                "2",
                "certificado-a3",
                "como instalar certificado a3 fisico",
                "Conecte o token...",
                &["certificado a3", "token"],
            ),
            kb_entry(
                "3",
                "pje",
                "como configurar o pje",
                "Acesse o portal do PJe...",
                &[],
            ),
            kb_entry(
                "4",
                "vidaas",
                "como usar o vidaas no celular",
                "Baixe o aplicativo Vidaas...",
                &["vidaas"],
            ),
        ])
        .unwrap();
        MatchEngine::new(Arc::new(store))
    }

    #[test]
    fn test_scenario_keyword_match() {
        let engine = support_engine();
        let answer = engine
            .answer_explained("Como faço para instalar meu Certificado A1 no Windows?")
            .unwrap();
        assert_eq!(answer.explain.method, Some(MatchMethod::Keyword));
        assert_eq!(answer.response.confidence, 1);
        assert_eq!(answer.response.reply, "Siga o passo 1...");
        assert_eq!(answer.response.category, "certificado-a1");
        assert_eq!(answer.response.related_topics, vec!["topic 1"]);
    }

    #[test]
    fn test_scenario_similarity_match() {
        let engine = support_engine();
        let answer = engine.answer_explained("nao consigo acessar o pje").unwrap();
        assert_eq!(answer.explain.method, Some(MatchMethod::Similarity));
        assert_eq!(answer.explain.entry_id.as_deref(), Some("3"));
        assert!(answer.explain.score.unwrap() > 0.3);
        assert_eq!(answer.response.confidence, 1);
        assert_eq!(answer.response.reply, "Acesse o portal do PJe...");
    }

    #[test]
    fn test_scenario_fallback() {
        let engine = support_engine();
        let answer = engine
            .answer_explained("qual a previsao do tempo hoje")
            .unwrap();
        assert_eq!(answer.explain.method, None);
        assert_eq!(answer.response.confidence, 0);
        assert_eq!(answer.response.category, FALLBACK_CATEGORY);
        assert!(answer.response.related_topics.is_empty());
    }

    #[test]
    fn test_invalid_queries_rejected() {
        let engine = support_engine();
        assert_eq!(engine.answer(""), Err(InvalidQuery::EmptyOrWrongType));
        assert_eq!(engine.answer(" "), Err(InvalidQuery::EmptyOrWrongType));
        assert_eq!(engine.answer(None::<&str>), Err(InvalidQuery::Missing));
        assert_eq!(engine.answer(QueryInput::NonText), Err(InvalidQuery::EmptyOrWrongType));

        let long = "x".repeat(501);
        assert_eq!(
            engine.answer(long.as_str()).unwrap_err().reason(),
            InvalidQueryReason::TooLong
        );
    }

    #[test]
    fn test_confidence_binary_and_category_present() {
        let engine = support_engine();
        let queries = [
            "token",
            "VIDAAS",
            "pje",
            "como instalar",
            "zzz",
            "?",
            "certificado a3 e certificado a1",
        ];
        for q in queries {
            let response = engine.answer(q).unwrap();
            assert!(response.confidence <= 1, "{}", q);
            assert!(!response.category.is_empty(), "{}", q);
        }
    }

    #[test]
    fn test_overlapping_keywords_resolve_by_store_order() {
        let engine = support_engine();
        let response = engine.answer("certificado a3 e certificado a1").unwrap();
        assert_eq!(response.reply, "Siga o passo 1...");
    }

    #[test]
    fn test_idempotent() {
        let engine = support_engine();
        for q in ["nao consigo acessar o pje", "Certificado A1", "bom dia"] {
            let first = serde_json::to_string(&engine.answer(q).unwrap()).unwrap();
            let second = serde_json::to_string(&engine.answer(q).unwrap()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_concurrent_readers_share_store() {
        let engine = support_engine();
        let expected = engine.answer("nao consigo acessar o pje").unwrap();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || engine.answer("nao consigo acessar o pje").unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_views() {
        let engine = support_engine();
        assert_eq!(
            engine.categories(),
            vec!["certificado-a1", "certificado-a3", "pje", "vidaas"]
        );
        assert_eq!(engine.questions_for("pje").len(), 1);
        assert_eq!(engine.stats().total_questions, 4);
    }
}
