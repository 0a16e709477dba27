//! Core error type.
//!
//! Higher crates define their own error enums and wrap `CoreError` with a
//! `#[from]` variant.

use thiserror::Error;

/// Errors produced while validating parameters and static records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid blockage on cell {cell}: {reason}")]
    InvalidBlockage { cell: String, reason: String },
}

/// Shorthand result type for `ped-core`.
pub type CoreResult<T> = Result<T, CoreError>;
