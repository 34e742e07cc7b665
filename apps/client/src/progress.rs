//! Player progress: level, coins and mastery counts.

use crate::api::ApiClient;
use spelling_core::Progress;

#[derive(Debug, Default)]
pub struct ProgressStore {
    progress: Progress,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn coins(&self) -> u32 {
        self.progress.coins
    }

    /// Reload progress from the service. Failures are logged and the last
    /// known values kept. Returns whether the reload succeeded.
    pub async fn refresh(&mut self, api: &ApiClient) -> bool {
        match api.progress().await {
            Ok(progress) => {
                self.progress = progress;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch progress");
                false
            }
        }
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.progress.coins = self.progress.coins.saturating_add(amount);
    }
}
