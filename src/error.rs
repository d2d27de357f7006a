//! Error types for the progress core.
//!
//! Store operations themselves are total: they log and fall back instead of
//! returning these. `ProgressError` surfaces from the helpers underneath them
//! (snapshot decoding, config parsing, storage access) and from import.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("invalid progress snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Config(String),

    #[error("base64 decode error: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("storage unavailable: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ProgressError>;
