//! JSON REST API for SnowOps organization roles.
//!
//! Exposes an axum [`Router`] backed by any [`snowops_core::store::Store`].
//! Every route requires an authenticated actor (see [`auth`]). TLS and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", snowops_api::api_router(state))
//! ```

pub mod auth;
pub mod drivers;
pub mod error;
pub mod organizations;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use snowops_core::{
  credential::CredentialHasher, directory::Directory, provision::Provisioner, store::Store,
};

pub use auth::AuthMode;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub directory:   Arc<Directory<S>>,
  pub provisioner: Arc<Provisioner<S>>,
  pub auth:        Arc<AuthMode>,
}

impl<S: Store> AppState<S> {
  pub fn new(store: Arc<S>, hasher: Arc<dyn CredentialHasher>, auth: AuthMode) -> Self {
    Self {
      directory:   Arc::new(Directory::new(Arc::clone(&store))),
      provisioner: Arc::new(Provisioner::new(store, hasher)),
      auth:        Arc::new(auth),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: Store + Clone + 'static,
{
  Router::new()
    .route(
      "/organizations",
      get(organizations::list::<S>).post(organizations::create::<S>),
    )
    .route("/organizations/{id}", get(organizations::get_one::<S>))
    .route("/users", get(users::find::<S>))
    .route("/drivers", post(drivers::create::<S>))
    .with_state(state)
}
