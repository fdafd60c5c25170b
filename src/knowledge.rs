//! Knowledge dataset loading.
//!
//! Reads the JSON dataset named by `[knowledge].path` and builds the
//! immutable [`KnowledgeStore`]. This runs once at startup; any problem here
//! (missing file, malformed JSON, duplicate ids) is fatal.
//!
//! The dataset is a JSON array of entries. Both the English field names and
//! the Portuguese names used by the legacy support dataset are accepted:
//!
//! ```json
//! [
//!   {
//!     "id": 1,
//!     "pergunta": "Como instalar o certificado A1 no Windows?",
//!     "resposta": "Siga o passo 1...",
//!     "categoria": "certificado-a1",
//!     "keywords": ["certificado a1", "a1 windows"],
//!     "topicos_relacionados": ["Certificado A1 no Mac"]
//!   }
//! ]
//! ```

use anyhow::{Context, Result};
use std::path::Path;

use kb_chat_core::{KnowledgeEntry, KnowledgeStore};

use crate::config::Config;

/// Parse a dataset from JSON text.
pub fn parse_knowledge(json: &str) -> Result<KnowledgeStore> {
    let entries: Vec<KnowledgeEntry> =
        serde_json::from_str(json).context("Failed to parse knowledge dataset")?;
    let store = KnowledgeStore::from_entries(entries).context("Invalid knowledge dataset")?;
    Ok(store)
}

/// Read and parse the dataset at `path`.
pub fn load_knowledge(path: &Path) -> Result<KnowledgeStore> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read knowledge dataset: {}", path.display()))?;
    let store =
        parse_knowledge(&content).with_context(|| format!("In dataset {}", path.display()))?;

    if store.is_empty() {
        tracing::warn!(path = %path.display(), "knowledge dataset is empty; every query will fall back");
    }
    tracing::info!(
        path = %path.display(),
        entries = store.len(),
        categories = store.categories().len(),
        "knowledge base loaded"
    );

    Ok(store)
}

/// Load the dataset configured in `[knowledge]`.
pub fn load_from_config(config: &Config) -> Result<KnowledgeStore> {
    load_knowledge(&config.knowledge.path)
}

/// CLI entry point for `kbchat check`.
pub fn run_check(config: &Config) -> Result<()> {
    let store = load_from_config(config)?;
    let stats = store.stats();
    let with_keywords = store.entries().filter(|e| !e.keywords.is_empty()).count();

    println!("Dataset:     {}", config.knowledge.path.display());
    println!("Entries:     {}", stats.total_questions);
    println!("Categories:  {}", stats.total_categories);
    println!(
        "Keywords:    {} / {} entries have keyword triggers",
        with_keywords, stats.total_questions
    );
    println!("ok");
    Ok(())
}
