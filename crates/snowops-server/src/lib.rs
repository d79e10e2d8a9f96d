//! Process wiring for the SnowOps roles service: configuration, the
//! top-level router and the `/health` check.

use std::path::{Path, PathBuf};

use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::{Value, json};
use snowops_api::{AppState, AuthMode, api_router};
use snowops_core::store::Store;
use thiserror::Error;
use tower_http::trace::TraceLayer;

/// Prefix of the environment variables that override the config file.
pub const ENV_PREFIX: &str = "SNOWOPS";

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  Load(#[from] config::ConfigError),

  #[error("auth_mode = \"jwt\" requires a non-empty jwt_secret")]
  MissingJwtSecret,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStrategy {
  #[default]
  Header,
  Jwt,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `SNOWOPS_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub auth_mode:  AuthStrategy,
  pub jwt_secret: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "0.0.0.0".to_owned(),
      port:       8080,
      store_path: PathBuf::from("snowops.db"),
      auth_mode:  AuthStrategy::Header,
      jwt_secret: String::new(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` under the environment and validate.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let cfg: Self = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()?;
    cfg.auth()?;
    Ok(cfg)
  }

  /// The actor-extraction strategy this configuration selects.
  pub fn auth(&self) -> Result<AuthMode, ConfigError> {
    match self.auth_mode {
      AuthStrategy::Header => Ok(AuthMode::Header),
      AuthStrategy::Jwt if self.jwt_secret.trim().is_empty() => {
        Err(ConfigError::MissingJwtSecret)
      }
      AuthStrategy::Jwt => Ok(AuthMode::jwt(&self.jwt_secret)),
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: `/health` plus the API under `/api/v1`.
pub fn app<S>(state: AppState<S>) -> Router
where
  S: Store + Clone + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api/v1", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
