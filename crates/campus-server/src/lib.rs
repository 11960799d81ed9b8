//! HTTP server for the campus leave workflow.
//!
//! Mounts [`campus_api::api_router`] under `/api` behind an HTTP Basic gate
//! and wraps everything in request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use campus_core::{
  directory::Directory,
  notification::{DEFAULT_NOTICE_WINDOW_DAYS, FeedConfig},
  store::LeaveStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Upper bound accepted for `notice_window_days`.
pub const MAX_NOTICE_WINDOW_DAYS: i64 = 3650;

fn default_notice_window_days() -> i64 { DEFAULT_NOTICE_WINDOW_DAYS }

/// Runtime server configuration, deserialised from `config.toml` and
/// `CAMPUS_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// How many days of module notices appear in a feed.
  #[serde(default = "default_notice_window_days")]
  pub notice_window_days: i64,
  /// JSON hierarchy seed applied at startup, if set.
  #[serde(default)]
  pub seed_path:          Option<PathBuf>,
}

impl ServerConfig {
  /// Reject settings that would make the server misbehave at runtime.
  pub fn validate(&self) -> anyhow::Result<()> {
    anyhow::ensure!(
      (1..=MAX_NOTICE_WINDOW_DAYS).contains(&self.notice_window_days),
      "notice_window_days must be between 1 and {MAX_NOTICE_WINDOW_DAYS}, got {}",
      self.notice_window_days
    );
    Ok(())
  }

  /// Feed settings; the window is clamped to the range [`validate`] accepts.
  ///
  /// [`validate`]: ServerConfig::validate
  pub fn feed_config(&self) -> FeedConfig {
    FeedConfig::with_window_days(self.notice_window_days.clamp(1, MAX_NOTICE_WINDOW_DAYS))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router is built from.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server router: `/health` is open, `/api/*` requires auth.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: LeaveStore + Directory + 'static,
{
  let api = campus_api::api_router(state.store, state.config.feed_config())
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .route("/health", get(|| async { "ok" }))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}
