//! TOML configuration parsing and validation.
//!
//! ```toml
//! [knowledge]
//! path = "./data/knowledge_base.json"
//!
//! [server]
//! bind = "127.0.0.1:3001"
//! cors_origins = []          # empty: any origin
//! body_limit_bytes = 10485760
//! ```

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub knowledge: KnowledgeConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgeConfig {
    /// JSON dataset, an array of knowledge entries.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .with_context(|| format!("server.bind is not a socket address: {}", self.bind))
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.knowledge.path.as_os_str().is_empty() {
        anyhow::bail!("knowledge.path must not be empty");
    }

    // Relative dataset paths resolve against the config file's directory.
    if config.knowledge.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.knowledge.path = dir.join(&config.knowledge.path);
        }
    }

    config.server.socket_addr()?;

    if config.server.body_limit_bytes == 0 {
        anyhow::bail!("server.body_limit_bytes must be > 0");
    }

    for origin in &config.server.cors_origins {
        if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
            anyhow::bail!("server.cors_origins contains an invalid origin: {:?}", origin);
        }
    }

    Ok(config)
}
