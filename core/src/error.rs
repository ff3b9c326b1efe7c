use crate::strategy::{StrategyError, StrategyId};
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonWriterError {
  #[error("I/O error while writing the response body: {0}")]
  Io(#[from] io::Error),
  #[error("Failed to serialize the response body: {0}")]
  Serialization(#[source] serde_json::Error),
  #[error("Failed to instantiate writer strategy {strategy}: {cause}")]
  StrategyInstantiation {
    strategy: StrategyId,
    #[source]
    cause: StrategyError,
  },
}

impl JsonWriterError {
  /// A broken writer strategy has no fallback; the request has to fail.
  pub fn is_unrecoverable(&self) -> bool {
    matches!(self, JsonWriterError::StrategyInstantiation { .. })
  }

  pub fn is_io(&self) -> bool {
    matches!(self, JsonWriterError::Io(_))
  }
}

impl From<serde_json::Error> for JsonWriterError {
  fn from(err: serde_json::Error) -> Self {
    if err.is_io() {
      JsonWriterError::Io(err.into())
    } else {
      JsonWriterError::Serialization(err)
    }
  }
}

static_assertions::assert_impl_all!(JsonWriterError: Send, Sync);
