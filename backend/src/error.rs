//! Domain-level error types.
//!
//! Absence of a record is never an error: reads return `Option`, updates
//! return `None` when there is nothing to update, and deletes are silent
//! no-ops. The only conditions surfaced as errors are rejected payloads
//! (`ValidationError`) and backend I/O failures (`StorageError`, defined in
//! the storage module).

use thiserror::Error;

/// A malformed payload rejected by a service before it reaches the store.
///
/// These are local, caller-correctable conditions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{0} must not be negative")]
    NegativeAmount(&'static str),

    #[error("quantity must be at least 1")]
    QuantityTooSmall,

    #[error("invalid month bucket '{0}', expected YYYY-MM")]
    InvalidMonth(String),

    #[error("charge day {0} is outside the range 1-31")]
    ChargeDayOutOfRange(u32),

    #[error("referenced {0} '{1}' does not exist")]
    MissingReference(&'static str, String),
}
