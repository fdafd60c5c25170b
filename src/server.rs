//! HTTP API for the support chatbot.
//!
//! A thin Axum layer over [`MatchEngine`]. The knowledge store is loaded once
//! before the listener starts and shared by every handler through an `Arc`;
//! handlers never lock or mutate anything.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/health` | Health check (version, uptime, entry count) |
//! | `POST` | `/api/message` | Answer a user message |
//! | `GET`  | `/api/categories` | Distinct categories |
//! | `GET`  | `/api/questions/{category}` | Questions in one category |
//! | `GET`  | `/api/stats` | Entry and category counts |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "MESSAGE_TOO_LONG", "message": "message too long: 612 characters (max 500)" } }
//! ```
//!
//! Codes: `MISSING_MESSAGE`, `INVALID_MESSAGE` and `MESSAGE_TOO_LONG` (400),
//! `bad_request` for an unreadable body (400, 413 or 415 as axum reports it)
//! and `NOT_FOUND` (404, which also lists the available routes).
//!
//! # CORS
//!
//! `[server].cors_origins` lists the allowed origins. When it is empty every
//! origin is allowed.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kb_chat_core::engine::MatchExplanation;
use kb_chat_core::models::{QuestionSummary, StoreStats};
use kb_chat_core::{InvalidQuery, KnowledgeStore, MatchEngine, QueryInput};

use crate::config::Config;
use crate::knowledge;

/// Routes reported by the 404 handler.
const AVAILABLE_ROUTES: &[&str] = &[
    "GET /api/health",
    "POST /api/message",
    "GET /api/categories",
    "GET /api/questions/{category}",
    "GET /api/stats",
];

/// Number of query characters written to the interaction log.
const LOG_PREVIEW_CHARS: usize = 50;

/// Shared state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    engine: MatchEngine,
    started_at: Instant,
    loaded_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(store: Arc<KnowledgeStore>) -> Self {
        Self {
            engine: MatchEngine::new(store),
            started_at: Instant::now(),
            loaded_at: Utc::now(),
        }
    }
}

/// Load the configured dataset and serve until Ctrl-C or SIGTERM.
///
/// This is the entry point used by `kbchat serve`.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(knowledge::load_from_config(config)?);
    run_server_with_store(config, store).await
}

/// Serve an already-built store.
pub async fn run_server_with_store(
    config: &Config,
    store: Arc<KnowledgeStore>,
) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let app = router(config, AppState::new(store))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("kbchat server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("kbchat server stopped");
    Ok(())
}

/// Build the application router with CORS, tracing and body-size layers.
pub fn router(config: &Config, state: AppState) -> anyhow::Result<Router> {
    Ok(Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/message", post(handle_message))
        .route("/api/categories", get(handle_categories))
        .route("/api/questions/{category}", get(handle_questions))
        .route("/api/stats", get(handle_stats))
        .fallback(handle_not_found)
        .method_not_allowed_fallback(handle_not_found)
        .layer(DefaultBodyLimit::max(config.server.body_limit_bytes))
        .layer(cors_layer(&config.server.cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
    #[serde(rename = "availableRoutes", skip_serializing_if = "Option::is_none")]
    available_routes: Option<&'static [&'static str]>,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    available_routes: Option<&'static [&'static str]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
            available_routes: self.available_routes,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(code: impl Into<String>, message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: code.into(),
        message: message.into(),
        available_routes: None,
    }
}

impl From<InvalidQuery> for AppError {
    fn from(err: InvalidQuery) -> Self {
        bad_request(err.reason().code(), err.to_string())
    }
}

// ============ GET /api/health ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    uptime_secs: u64,
    entries: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        entries: state.engine.store().len(),
    })
}

// ============ POST /api/message ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageResponse {
    #[serde(flatten)]
    response: kb_chat_core::Response,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    explain: Option<MatchExplanation>,
}

/// Handler for `POST /api/message`.
///
/// Expects `{"message": "...", "explain": false}`. Returns `400` for a
/// missing, empty, non-string, or over-long message. A query nothing matches
/// is still a `200` with `confidence: 0`.
async fn handle_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError {
        status: e.status(),
        code: "bad_request".to_string(),
        message: e.body_text(),
        available_routes: None,
    })?;

    let raw = body.get("message");
    let input = QueryInput::from_json(raw);
    let explain = body.get("explain").and_then(Value::as_bool).unwrap_or(false);

    let answer = state.engine.answer_explained(input).map_err(|e| {
        tracing::debug!(reason = e.reason().code(), "rejected message");
        AppError::from(e)
    })?;

    tracing::info!(
        query = %preview(raw.and_then(serde_json::Value::as_str).unwrap_or_default()),
        confidence = answer.response.confidence,
        "answered message"
    );

    Ok(Json(MessageResponse {
        response: answer.response,
        timestamp: Utc::now().to_rfc3339(),
        explain: explain.then_some(answer.explain),
    }))
}

fn preview(query: &str) -> String {
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(LOG_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

// ============ GET /api/categories ============

#[derive(Serialize)]
struct CategoriesResponse {
    categories: Vec<String>,
    total: usize,
}

async fn handle_categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    let categories = state.engine.categories();
    Json(CategoriesResponse {
        total: categories.len(),
        categories,
    })
}

// ============ GET /api/questions/{category} ============

#[derive(Serialize)]
struct QuestionsResponse {
    category: String,
    questions: Vec<QuestionSummary>,
    total: usize,
}

/// An unknown category yields an empty list, not a 404.
async fn handle_questions(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<QuestionsResponse> {
    let questions = state.engine.questions_for(&category);
    Json(QuestionsResponse {
        category,
        total: questions.len(),
        questions,
    })
}

// ============ GET /api/stats ============

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(flatten)]
    stats: StoreStats,
    /// When the knowledge base was loaded.
    last_updated: String,
}

async fn handle_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.engine.stats(),
        last_updated: state.loaded_at.to_rfc3339(),
    })
}

// ============ fallback ============

async fn handle_not_found() -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "NOT_FOUND".to_string(),
        message: "route not found".to_string(),
        available_routes: Some(AVAILABLE_ROUTES),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_queries() {
        let long = "a".repeat(80);
        let p = preview(&long);
        assert_eq!(p.chars().count(), LOG_PREVIEW_CHARS + 3);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_queries() {
        assert_eq!(preview("oi pje"), "oi pje");
        assert_eq!(preview(&"b".repeat(LOG_PREVIEW_CHARS)), "b".repeat(LOG_PREVIEW_CHARS));
    }

    #[test]
    fn test_preview_keeps_raw_text() {
        let body = serde_json::json!({"message": "  Não consigo acessar o PJe  "});
        let raw = body.get("message").and_then(Value::as_str).unwrap_or_default();
        assert_eq!(preview(raw), "  Não consigo acessar o PJe  ");
    }

    #[test]
    fn test_invalid_query_maps_to_400_codes() {
        let err = AppError::from(InvalidQuery::TooLong { chars: 600 });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "MESSAGE_TOO_LONG");
        assert!(err.message.contains("600"));

        let err = AppError::from(InvalidQuery::Missing);
        assert_eq!(err.code, "MISSING_MESSAGE");
    }

    #[test]
    fn test_cors_layer_rejects_bad_origin() {
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
