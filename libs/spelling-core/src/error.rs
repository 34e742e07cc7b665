//! Error types for spelling-core.

use crate::types::Difficulty;
use thiserror::Error;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Failures reported by the word, spell-check and progress services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("request timed out, check your network connection")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("backend error: {status} - {message}")]
    Backend { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors surfaced by a game session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no words available for difficulty {difficulty}, upload a word list first")]
    NoWordsAvailable { difficulty: Difficulty },

    #[error("failed to load words: {0}")]
    Transport(#[source] BackendError),

    #[error("failed to check spelling, please try again: {0}")]
    CheckFailed(#[source] BackendError),

    #[error("failed to mark word as studied: {0}")]
    NotificationFailed(#[source] BackendError),
}
