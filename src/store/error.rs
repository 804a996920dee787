// src/store/error.rs

use thiserror::Error;

/// Failures surfaced by [`Store`](super::Store) operations.
///
/// Every failing operation leaves the store unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid access code")]
    InvalidCode,

    #[error("access code is not valid for this test")]
    WrongTest,

    #[error("{0} has expired")]
    Expired(&'static str),

    #[error("access code usage limit reached")]
    LimitReached,

    #[error("question position {position} out of range (attempt has {len} questions)")]
    OutOfRange { position: u64, len: usize },

    #[error("inconsistent state: {0}")]
    Inconsistent(String),

    #[error("cannot hash password: {0}")]
    Hashing(String),
}
