//! Core spelling game library shared by the game clients.
//!
//! Provides:
//! - Session state machine for learning and challenge rounds
//! - Positional character diff and spelling hints
//! - Traits for the word, spell-check and progress services
//! - Shared types (Word, Difficulty, GameSettings, etc.)

pub mod backend;
pub mod diff;
pub mod error;
pub mod session;
pub mod types;

pub use backend::{GameBackend, ProgressTracker, SettingsProvider, SpellChecker, WordProvider};
pub use diff::{fold, highlight, hint, is_match, DiffSegment, DiffStatus, Hint};
pub use error::{BackendError, Result, SessionError};
pub use session::{Session, SessionMode, SessionSnapshot};
pub use types::{
    Difficulty, GameSettings, Progress, ReviewCount, SpellCheck, Word, WordId, WordStats,
};
