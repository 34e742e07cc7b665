//! Services a game session talks to.

use crate::error::BackendError;
use crate::types::{Difficulty, GameSettings, SpellCheck, Word, WordId};
use std::future::Future;

/// Supplies batches of words for a difficulty tier.
pub trait WordProvider: Send + Sync {
    /// Fetch up to `limit` words. An empty batch is a valid answer.
    fn fetch_words(
        &self,
        difficulty: Difficulty,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Word>, BackendError>> + Send;
}

/// Judges a typed spelling of a word.
pub trait SpellChecker: Send + Sync {
    fn check_spelling(
        &self,
        word_id: WordId,
        input: &str,
    ) -> impl Future<Output = Result<SpellCheck, BackendError>> + Send;
}

/// Records learning progress.
pub trait ProgressTracker: Send + Sync {
    fn mark_studied(&self, word_id: WordId) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Everything a session needs from the outside world.
pub trait GameBackend: WordProvider + SpellChecker + ProgressTracker {}

impl<T: WordProvider + SpellChecker + ProgressTracker> GameBackend for T {}

/// Read-only game configuration, consulted when a session starts.
pub trait SettingsProvider {
    fn game_settings(&self) -> GameSettings;
}

impl SettingsProvider for GameSettings {
    fn game_settings(&self) -> GameSettings {
        self.clone()
    }
}
