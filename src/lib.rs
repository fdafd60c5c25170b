//! # kb-chat
//!
//! A knowledge-base support chatbot. Incoming questions are matched against a
//! fixed FAQ dataset (digital certificates, court-system portals) and answered
//! with the stored reply, or with a fallback listing the supported topics.
//!
//! Matching itself lives in the `kb-chat-core` crate. This crate wires it to
//! a TOML configuration, a JSON dataset loader, a CLI and an HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────┐
//! │ JSON dataset │──▶│ KnowledgeStore (Arc, RO)  │
//! └──────────────┘   └────────────┬─────────────┘
//!                                 │
//!                      ┌──────────┴──────────┐
//!                      ▼                     ▼
//!                 ┌──────────┐         ┌──────────┐
//!                 │   CLI    │         │   HTTP   │
//!                 │ (kbchat) │         │  (axum)  │
//!                 └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! kbchat check                               # validate config and dataset
//! kbchat ask "como instalar o certificado a1?"
//! kbchat ask "nao consigo acessar o pje" --explain
//! kbchat serve                               # start HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`knowledge`] | Dataset loading, `kbchat check` |
//! | [`ask`] | `kbchat ask` |
//! | [`catalog`] | `kbchat categories` / `kbchat questions` |
//! | [`stats`] | `kbchat stats` |
//! | [`server`] | HTTP API |

pub mod ask;
pub mod catalog;
pub mod config;
pub mod knowledge;
pub mod server;
pub mod stats;

pub use kb_chat_core;
