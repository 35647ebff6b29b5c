//! LearnHub · learning platform backend
//!
//! - Axum HTTP API: lessons, daily tip, daily challenge, coding hints
//! - Optional OpenAI hints (via environment variables), local heuristics otherwise
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   STATIC_DIR          : front-end bundle directory (default ./static)
//!   CONTENT_CONFIG_PATH : path to TOML content file (prompts, groups, lessons, tips)
//!   OPENAI_API_KEY      : enables model hints if present
//!   OPENAI_BASE_URL     : default "https://api.openai.com/v1"
//!   OPENAI_MODEL        : default "gpt-4o-mini"
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use learnhub_backend::config::ServerConfig;
use learnhub_backend::routes::build_router;
use learnhub_backend::state::AppState;
use learnhub_backend::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let server = ServerConfig::from_env();

  // Content is loaded and validated once; handlers only read it.
  let state = Arc::new(AppState::new(&server)?);

  let app = build_router(state, &server.static_dir);

  let listener = TcpListener::bind(server.addr).await?;
  info!(target: "learnhub_backend", addr = %server.addr, static_dir = %server.static_dir, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "learnhub_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(target: "learnhub_backend", error = %e, "Failed to listen for Ctrl+C; running until killed");
    std::future::pending::<()>().await;
  }
  info!(target: "learnhub_backend", "Shutdown signal received");
}
