//! Error types for `campus-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::request::{Action, MedicalStatus};

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed input; never retried automatically.
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("cannot {action} request {request_id} while it is {from}")]
  InvalidTransition {
    request_id: Uuid,
    from:       MedicalStatus,
    action:     Action,
  },

  /// Lost a compare-and-set race; safe to retry after re-reading.
  #[error("request {0} was modified concurrently")]
  Conflict(Uuid),

  #[error("forward target {0} is not a known lecturer")]
  InvalidTarget(Uuid),

  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: Uuid },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("directory error: {0}")]
  Directory(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }

  pub(crate) fn directory(
    e: impl std::error::Error + Send + Sync + 'static,
  ) -> Self {
    Self::Directory(Box::new(e))
  }

  pub(crate) fn not_found(kind: &'static str, id: Uuid) -> Self {
    Self::NotFound { kind, id }
  }

  /// Stable machine-readable name for the error category.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Validation(_) => "validation",
      Self::InvalidTransition { .. } => "invalid_transition",
      Self::Conflict(_) => "conflict",
      Self::InvalidTarget(_) => "invalid_target",
      Self::NotFound { .. } => "not_found",
      Self::Store(_) => "store",
      Self::Directory(_) => "directory",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
