//! Turns a [`MatchResult`] into the caller-facing [`Response`].
//!
//! Confidence is binary: `1` for any match, `0` for the fallback. Neither the
//! matcher that produced the hit nor the similarity score is reflected in
//! the response. This is a known limitation kept for compatibility with
//! existing consumers; use [`crate::engine::MatchEngine::answer_explained`]
//! to inspect the raw score.

use crate::models::{MatchResult, Response};

/// Category reported on the no-match response.
pub const FALLBACK_CATEGORY: &str = "fallback";

/// Topic areas the support bot covers, listed in the fallback reply.
pub const SUPPORTED_TOPICS: &[&str] = &[
    "Instalação de Certificados A1 (Windows/Mac)",
    "Instalação de Certificados A3 Físico",
    "Configuração do Vidaas (Computador/Celular)",
    "Configuração no PJe",
    "Configuração no Projudi",
];

/// The fixed reply sent when nothing matched.
pub fn fallback_reply() -> String {
    let mut reply = String::from(
        "Desculpe, não encontrei uma resposta específica para sua pergunta. \
         Posso ajudar com informações sobre:\n\n",
    );
    for topic in SUPPORTED_TOPICS {
        reply.push_str("• ");
        reply.push_str(topic);
        reply.push('\n');
    }
    reply.push_str(
        "\nPor favor, reformule sua pergunta ou entre em contato com nosso suporte técnico.",
    );
    reply
}

pub fn compose(result: &MatchResult<'_>) -> Response {
    match result {
        MatchResult::Matched { entry, .. } => Response {
            reply: entry.answer.clone(),
            confidence: 1,
            category: entry.category.clone(),
            related_topics: entry.related_topics.clone(),
        },
        MatchResult::NoMatch => Response {
            reply: fallback_reply(),
            confidence: 0,
            category: FALLBACK_CATEGORY.to_string(),
            related_topics: Vec::new(),
        },
    }
}
