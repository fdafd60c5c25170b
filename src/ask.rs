//! One-shot question answering from the command line.
//!
//! `kbchat ask "<query>"` runs the same pipeline as `POST /api/message` and
//! prints the reply with its category, confidence and related topics.

use anyhow::{Context, Result};
use std::sync::Arc;

use kb_chat_core::engine::Answer;
use kb_chat_core::MatchEngine;

use crate::config::Config;
use crate::knowledge;

/// Run the ask command. An invalid query is returned as an error, so the
/// process exits non-zero with the reason on stderr.
pub fn run_ask(config: &Config, query: &str, explain: bool) -> Result<()> {
    let store = knowledge::load_from_config(config)?;
    let engine = MatchEngine::new(Arc::new(store));

    let answer = engine
        .answer_explained(query)
        .context("Query rejected")?;

    print!("{}", render_answer(&answer, explain));
    Ok(())
}

fn render_answer(answer: &Answer, explain: bool) -> String {
    let response = &answer.response;
    let mut out = String::new();

    out.push_str(&response.reply);
    out.push_str("\n\n");
    out.push_str(&format!("category:   {}\n", response.category));
    out.push_str(&format!("confidence: {}\n", response.confidence));
    if !response.related_topics.is_empty() {
        out.push_str("related:\n");
        for topic in &response.related_topics {
            out.push_str(&format!("  - {}\n", topic));
        }
    }

    if explain {
        let e = &answer.explain;
        out.push('\n');
        out.push_str(&format!("normalized: {:?}\n", e.normalized_query));
        out.push_str(&format!(
            "method:     {}\n",
            e.method.map_or_else(|| "fallback".to_string(), |m| m.to_string())
        ));
        if let Some(id) = &e.entry_id {
            out.push_str(&format!("entry:      {}\n", id));
        }
        if let Some(score) = e.score {
            out.push_str(&format!("score:      {:.3}\n", score));
        }
    }

    out
}
