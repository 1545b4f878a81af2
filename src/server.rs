//! HTTP transport around the chat bot.
//!
//! Thin axum wrapper exposing the orchestrator to the website widget.
//! The ask endpoint always answers 200 with an answer payload: the
//! pipeline converts every internal failure into a natural-language
//! answer, so the chat experience degrades instead of breaking.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/ask` | Answer a visitor question |
//! | `GET`  | `/api/health` | Health check (version + database reachability) |
//! | `GET`  | `/api/admin/bot-stats` | Response-cache statistics |
//! | `POST` | `/api/admin/clear-cache` | Drop all cached answers |
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted: the widget is served
//! from the school site while the API may live on another host.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::bot::ChatBot;
use crate::config::Config;
use crate::models::ChatResponse;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    bot: Arc<ChatBot>,
    pool: SqlitePool,
}

/// Start the HTTP server and serve until the process is terminated.
pub async fn run_server(config: &Config, bot: Arc<ChatBot>, pool: SqlitePool) -> anyhow::Result<()> {
    let state = AppState { bot, pool };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/ask", post(handle_ask))
        .route("/api/health", get(handle_health))
        .route("/api/admin/bot-stats", get(handle_bot_stats))
        .route("/api/admin/clear-cache", post(handle_clear_cache))
        .layer(cors)
        .with_state(state);

    info!("chat API listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ POST /api/ask ============

/// JSON request body for `POST /api/ask`.
#[derive(Deserialize)]
struct AskRequest {
    /// The visitor's question. Missing or blank input gets the fixed
    /// prompt-for-input answer.
    #[serde(default)]
    question: String,
}

/// Handler for `POST /api/ask`. Infallible by design.
async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Json<ChatResponse> {
    Json(state.bot.answer_question(&request.question).await)
}

// ============ GET /api/health ============

/// JSON response body for `GET /api/health`.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    database: String,
    timestamp: String,
}

/// Handler for `GET /api/health`. Reports degraded status instead of an
/// HTTP error when the database is unreachable.
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok".to_string(),
        Err(err) => format!("error: {err}"),
    };
    let status = if database == "ok" { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}

// ============ Admin: cache stats / clear ============

/// JSON response body for `GET /api/admin/bot-stats`.
#[derive(Serialize)]
struct BotStatsResponse {
    status: String,
    cache_size: usize,
    /// First few cached keys, for eyeballing what visitors ask.
    cache_keys: Vec<String>,
    timestamp: String,
}

async fn handle_bot_stats(State(state): State<AppState>) -> Json<BotStatsResponse> {
    let stats = state.bot.cache_stats();
    Json(BotStatsResponse {
        status: "success".to_string(),
        cache_size: stats.count,
        cache_keys: stats.keys.into_iter().take(10).collect(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// JSON response body for `POST /api/admin/clear-cache`.
#[derive(Serialize)]
struct ClearCacheResponse {
    status: String,
    message: String,
}

async fn handle_clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    state.bot.clear_cache();
    Json(ClearCacheResponse {
        status: "success".to_string(),
        message: "Cache cleared successfully".to_string(),
    })
}
