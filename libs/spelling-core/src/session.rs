//! Game session state machine.
//!
//! A session moves `Idle -> Learning -> Challenge -> Ended`, or straight
//! from `Idle` to `Challenge`. Mode changes only through the explicit
//! start, switch and end operations; running out of words, lives or time
//! in a challenge ends it.
//!
//! Async operations take `&mut self`, so at most one mutating call can be
//! in flight per session.

use crate::backend::{GameBackend, SettingsProvider};
use crate::error::{Result, SessionError};
use crate::types::{Difficulty, GameSettings, SpellCheck, Word, WordId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Word fetches are tried at most this many times on transport failure.
const MAX_FETCH_ATTEMPTS: usize = 2;

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Idle,
    Learning,
    Challenge,
    Ended,
}

impl Default for SessionMode {
    fn default() -> Self {
        Self::Idle
    }
}

/// Point-in-time view of a session for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mode: SessionMode,
    pub difficulty: Difficulty,
    pub position: usize,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_word: Option<Word>,
    pub score: u32,
    pub lives: u32,
    pub time_remaining: u32,
    pub correct_count: u32,
    pub total_count: u32,
    pub accuracy_percent: u32,
    pub studied_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// A single learning or challenge session.
pub struct Session<B> {
    backend: B,
    settings: GameSettings,
    difficulty: Difficulty,
    words: Vec<Word>,
    position: usize,
    score: u32,
    lives: u32,
    mode: SessionMode,
    time_remaining: u32,
    correct_count: u32,
    total_count: u32,
    studied_words: HashSet<WordId>,
    last_error: Option<String>,
}

impl<B> Session<B> {
    /// Create an empty idle session.
    pub fn new(backend: B) -> Self {
        let settings = GameSettings::default();
        Self {
            backend,
            lives: settings.initial_lives,
            time_remaining: settings.time_limit,
            settings,
            difficulty: Difficulty::default(),
            words: Vec::new(),
            position: 0,
            score: 0,
            mode: SessionMode::Idle,
            correct_count: 0,
            total_count: 0,
            studied_words: HashSet::new(),
            last_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Settings captured when the session started.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current_word(&self) -> Option<&Word> {
        self.words.get(self.position)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Fraction of answers that were correct (0.0 before any answer).
    pub fn accuracy(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        f64::from(self.correct_count) / f64::from(self.total_count)
    }

    /// Accuracy as a rounded percentage.
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy() * 100.0).round() as u32
    }

    pub fn studied_words(&self) -> &HashSet<WordId> {
        &self.studied_words
    }

    pub fn is_studied(&self, word_id: WordId) -> bool {
        self.studied_words.contains(&word_id)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_ended(&self) -> bool {
        self.mode == SessionMode::Ended
    }

    /// Whether the current word is the last one of the batch.
    pub fn is_last_word(&self) -> bool {
        !self.words.is_empty() && self.position + 1 >= self.words.len()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            difficulty: self.difficulty,
            position: self.position,
            word_count: self.words.len(),
            current_word: self.current_word().cloned(),
            score: self.score,
            lives: self.lives,
            time_remaining: self.time_remaining,
            correct_count: self.correct_count,
            total_count: self.total_count,
            accuracy_percent: self.accuracy_percent(),
            studied_count: self.studied_words.len(),
            last_error: self.last_error.clone(),
        }
    }

    /// Move to the next word.
    ///
    /// At the last word a challenge ends; learning mode stays put until the
    /// player switches modes. An ended session no longer moves.
    pub fn advance(&mut self) {
        if self.mode == SessionMode::Ended {
            return;
        }
        if self.position + 1 < self.words.len() {
            self.position += 1;
            self.last_error = None;
        } else if self.mode == SessionMode::Challenge {
            self.end_session();
        }
    }

    /// Move back one word. A no-op at the first word or once ended.
    pub fn retreat(&mut self) {
        if self.mode != SessionMode::Ended && self.position > 0 {
            self.position -= 1;
            self.last_error = None;
        }
    }

    /// Switch a learning session into a challenge over the same words.
    ///
    /// Returns `false` and leaves the session untouched when not in
    /// learning mode.
    pub fn switch_to_challenge(&mut self) -> bool {
        if self.mode != SessionMode::Learning {
            tracing::warn!(mode = ?self.mode, "ignoring switch to challenge outside learning mode");
            return false;
        }

        self.reset_round();
        self.mode = SessionMode::Challenge;
        tracing::info!(words = self.words.len(), "switched to challenge");
        true
    }

    /// Count down one second of challenge time. Returns the time left.
    ///
    /// Reaching zero ends the challenge wherever the player is.
    pub fn tick(&mut self) -> u32 {
        if self.mode != SessionMode::Challenge {
            return self.time_remaining;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            tracing::info!("challenge time is up");
            self.end_session();
        }
        self.time_remaining
    }

    /// End the session and drop any surfaced error. Idempotent.
    pub fn end_session(&mut self) {
        if self.mode != SessionMode::Ended {
            tracing::info!(
                score = self.score,
                correct = self.correct_count,
                total = self.total_count,
                "session ended"
            );
        }
        self.mode = SessionMode::Ended;
        self.last_error = None;
    }

    /// Drop all words and counters and go back to idle.
    pub fn reset(&mut self) {
        self.settings = GameSettings::default();
        self.difficulty = Difficulty::default();
        self.words.clear();
        self.studied_words.clear();
        self.mode = SessionMode::Idle;
        self.reset_round();
    }

    fn reset_round(&mut self) {
        self.position = 0;
        self.score = 0;
        self.lives = self.settings.initial_lives;
        self.time_remaining = self.settings.time_limit;
        self.correct_count = 0;
        self.total_count = 0;
        self.last_error = None;
    }
}

impl<B: GameBackend + Clone + 'static> Session<B> {
    /// Fetch a batch of words and start a challenge.
    pub async fn start_challenge<S: SettingsProvider + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        settings: &S,
    ) -> Result<()> {
        self.start(difficulty, settings.game_settings(), SessionMode::Challenge)
            .await
    }

    /// Fetch a batch of words and start learning them.
    pub async fn start_learning<S: SettingsProvider + ?Sized>(
        &mut self,
        difficulty: Difficulty,
        settings: &S,
    ) -> Result<()> {
        self.start(difficulty, settings.game_settings(), SessionMode::Learning)
            .await
    }

    async fn start(
        &mut self,
        difficulty: Difficulty,
        settings: GameSettings,
        mode: SessionMode,
    ) -> Result<()> {
        let settings = settings.normalized();
        let limit = settings.words_per_round as usize;

        let words = match self.load_words(difficulty, limit).await {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!(%difficulty, error = %e, "failed to start session");
                self.last_error = Some(e.to_string());
                return Err(e);
            }
        };

        tracing::info!(
            %difficulty,
            requested = limit,
            received = words.len(),
            ?mode,
            "session started"
        );

        self.settings = settings;
        self.difficulty = difficulty;
        self.words = words;
        self.studied_words.clear();
        self.reset_round();
        self.mode = mode;
        Ok(())
    }

    async fn load_words(&self, difficulty: Difficulty, limit: usize) -> Result<Vec<Word>> {
        let mut attempt = 1;
        loop {
            match self.backend.fetch_words(difficulty, limit).await {
                Ok(words) if words.is_empty() => {
                    return Err(SessionError::NoWordsAvailable { difficulty });
                }
                Ok(words) => return Ok(words),
                Err(e) if attempt < MAX_FETCH_ATTEMPTS => {
                    tracing::warn!(attempt, error = %e, "word fetch failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(SessionError::Transport(e)),
            }
        }
    }

    /// Check the player's spelling of the current word.
    ///
    /// Returns `None` without touching any counter when there is no current
    /// word, the session has ended, or the checker fails. On checker failure
    /// `last_error` is set and the same word can be submitted again.
    pub async fn submit_answer(&mut self, input: &str) -> Option<SpellCheck> {
        if self.mode == SessionMode::Ended {
            return None;
        }
        let word_id = self.current_word()?.id;

        let verdict = match self.backend.check_spelling(word_id, input).await {
            Ok(verdict) => verdict,
            Err(e) => {
                let error = SessionError::CheckFailed(e);
                tracing::warn!(word_id, %error, "spell check failed");
                self.last_error = Some(error.to_string());
                return None;
            }
        };

        self.total_count += 1;
        if verdict.correct {
            self.correct_count += 1;
            self.score = self.score.saturating_add(self.settings.points_per_correct);
        } else {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 && self.mode == SessionMode::Challenge {
                tracing::info!("out of lives");
                self.end_session();
            }
        }
        self.last_error = None;

        Some(verdict)
    }

    /// Mark the current word as studied. Learning mode only.
    ///
    /// The progress service is notified on a detached task whose outcome is
    /// never reported back; local state does not wait for it. Returns
    /// whether the word was newly added.
    pub fn mark_current_studied(&mut self) -> bool {
        if self.mode != SessionMode::Learning {
            return false;
        }
        let Some(word_id) = self.current_word().map(|w| w.id) else {
            return false;
        };

        let inserted = self.studied_words.insert(word_id);
        self.notify_studied(word_id);
        inserted
    }

    fn notify_studied(&self, word_id: WordId) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(word_id, "no async runtime, skipping progress notification");
            return;
        };

        let backend = self.backend.clone();
        handle.spawn(async move {
            if let Err(e) = backend.mark_studied(word_id).await {
                let error = SessionError::NotificationFailed(e);
                tracing::debug!(word_id, %error, "progress notification dropped");
            }
        });
    }
}
