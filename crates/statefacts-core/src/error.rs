//! Error types for `statefacts-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required request field is missing or has the wrong shape.
  #[error("{0}")]
  InvalidInput(String),

  /// No matching state, fun-fact document, or fun fact.
  #[error("{0}")]
  NotFound(String),

  #[error("fun facts for {0} already exist")]
  AlreadyExists(String),

  /// The backing store failed. The source is logged, never shown to callers.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("reference dataset is malformed: {0}")]
  Dataset(#[from] serde_json::Error),

  #[error("reference dataset lists {0} more than once")]
  DuplicateCode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
