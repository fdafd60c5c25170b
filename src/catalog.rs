//! Browsing commands: `kbchat categories` and `kbchat questions <category>`.

use anyhow::Result;

use kb_chat_core::models::QuestionSummary;

use crate::config::Config;
use crate::knowledge;

/// Print one category per line, in dataset order.
pub fn run_categories(config: &Config) -> Result<()> {
    let store = knowledge::load_from_config(config)?;
    for category in store.categories() {
        println!("{}", category);
    }
    Ok(())
}

/// Print the questions filed under `category`.
pub fn run_questions(config: &Config, category: &str) -> Result<()> {
    let store = knowledge::load_from_config(config)?;
    let questions = store.questions_for(category);

    if questions.is_empty() {
        println!("No questions in category '{}'.", category);
        return Ok(());
    }

    print!("{}", render_questions(&questions));
    Ok(())
}

fn render_questions(questions: &[QuestionSummary]) -> String {
    let id_width = questions
        .iter()
        .map(|q| q.id.chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = format!("{:<width$}  QUESTION\n", "ID", width = id_width);
    for q in questions {
        out.push_str(&format!("{:<width$}  {}\n", q.id, q.question, width = id_width));
    }
    out
}
