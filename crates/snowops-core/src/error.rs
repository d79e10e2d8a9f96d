//! Error types for `snowops-core`.
//!
//! Every failure the core can produce belongs to exactly one [`ErrorKind`].
//! Transport layers map the kind to a status; they never need to inspect the
//! variant or its source chain.

use thiserror::Error;
use uuid::Uuid;

/// A boxed error from a collaborator (storage backend, hasher).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
  /// The actor triple was missing or incomplete.
  #[error("unauthenticated")]
  Unauthenticated,

  #[error("malformed input: {0}")]
  Malformed(String),

  #[error("unsupported organization type: {0:?}")]
  UnsupportedOrgType(String),

  #[error("forbidden")]
  Forbidden,

  #[error("{0} not found")]
  NotFound(&'static str),

  /// The organization bound to the actor is missing or tombstoned.
  #[error("acting organization {0} is unavailable")]
  ActingOrgUnavailable(Uuid),

  #[error("failed to hash credential: {0}")]
  Hash(String),

  #[error("failed to begin unit of work: {0}")]
  Begin(#[source] BoxError),

  #[error("failed to create {entity}: {source}")]
  Write {
    entity: &'static str,
    #[source]
    source: BoxError,
  },

  #[error("failed to commit unit of work: {0}")]
  Commit(#[source] BoxError),

  #[error("store error: {0}")]
  Store(#[source] BoxError),
}

/// The externally observable class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Unauthenticated,
  MalformedInput,
  Forbidden,
  NotFound,
  DependencyFailure,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Unauthenticated => ErrorKind::Unauthenticated,
      Self::Malformed(_) | Self::UnsupportedOrgType(_) => ErrorKind::MalformedInput,
      Self::Forbidden => ErrorKind::Forbidden,
      Self::NotFound(_) | Self::ActingOrgUnavailable(_) => ErrorKind::NotFound,
      Self::Hash(_)
      | Self::Begin(_)
      | Self::Write { .. }
      | Self::Commit(_)
      | Self::Store(_) => ErrorKind::DependencyFailure,
    }
  }

  /// A message safe to show to callers: never includes collaborator error
  /// text.
  pub fn public_message(&self) -> String {
    match self {
      Self::Unauthenticated => "unauthorized".to_owned(),
      Self::Malformed(m) => m.clone(),
      Self::UnsupportedOrgType(_) => "unsupported organization type".to_owned(),
      Self::Forbidden => "forbidden".to_owned(),
      Self::NotFound(what) => format!("{what} not found"),
      Self::ActingOrgUnavailable(_) => "organization not found".to_owned(),
      Self::Hash(_) => "failed to hash password".to_owned(),
      Self::Begin(_) => "failed to start transaction".to_owned(),
      Self::Write { entity, .. } => format!("failed to create {entity}"),
      Self::Commit(_) => "failed to commit transaction".to_owned(),
      Self::Store(_) => "storage query failed".to_owned(),
    }
  }

  /// Wrap a backend read error.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
