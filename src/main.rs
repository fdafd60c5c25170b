//! # kbchat CLI
//!
//! The `kbchat` binary answers support questions from a fixed knowledge base,
//! either one at a time from the shell or through the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! kbchat --config ./config/kbchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kbchat check` | Validate the config and the dataset |
//! | `kbchat ask "<query>"` | Answer one question |
//! | `kbchat categories` | List categories |
//! | `kbchat questions <category>` | List the questions in a category |
//! | `kbchat stats` | Entry and category counts |
//! | `kbchat serve` | Start the HTTP server |
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`), so
//! command output on stdout stays clean.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kb_chat::{ask, catalog, config, knowledge, server, stats};

/// kbchat: keyword and similarity matching over a support FAQ.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/kbchat.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "kbchat",
    about = "Support chatbot answering questions from a fixed knowledge base",
    version,
    long_about = "kbchat matches a user's question against a JSON FAQ dataset, first by \
    keyword triggers and then by bigram similarity, and answers with the stored reply or a \
    fallback listing the supported topics. It runs as a CLI or as an HTTP API."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/kbchat.toml`.
    #[arg(long, global = true, default_value = "./config/kbchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Load the config and dataset and report what was found.
    ///
    /// Fails on a missing file, malformed JSON, or duplicate entry ids.
    Check,

    /// Answer a single question.
    Ask {
        /// The question, up to 500 characters.
        query: String,

        /// Also print the match method, matched entry id and similarity score.
        #[arg(long)]
        explain: bool,
    },

    /// List the distinct categories in dataset order.
    Categories,

    /// List the questions in one category.
    Questions {
        /// Category name (e.g. `pje`).
        category: String,
    },

    /// Show totals and a per-category breakdown.
    Stats,

    /// Start the HTTP server.
    ///
    /// Binds to the address configured in `[server].bind`.
    Serve,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Check => {
            knowledge::run_check(&cfg)?;
        }
        Commands::Ask { query, explain } => {
            ask::run_ask(&cfg, &query, explain)?;
        }
        Commands::Categories => {
            catalog::run_categories(&cfg)?;
        }
        Commands::Questions { category } => {
            catalog::run_questions(&cfg, &category)?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg)?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
