use std::io;

use thiserror::Error;

/// Error type for keyword store operations
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("keyword {0:?} already exists")]
  DuplicateKeyword(String),

  #[error("no keyword row with id {0}")]
  NotFound(u64),

  #[error("invalid keyword entry: {0}")]
  InvalidEntry(String),
}
