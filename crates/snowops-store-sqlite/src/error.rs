//! Error type for `snowops-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored role or organization type outside the taxonomy.
  #[error("unknown {column} value: {value:?}")]
  UnknownTag { column: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
