//! Application state.

use crate::api::ApiClient;
use crate::progress::ProgressStore;
use crate::settings::FileSettingsStore;
use spelling_core::Session;

/// Everything the terminal front-end works with.
pub struct AppState {
    pub api: ApiClient,
    pub settings: FileSettingsStore,
    pub session: Session<ApiClient>,
    pub progress: ProgressStore,
}

impl AppState {
    pub fn new(api: ApiClient, settings: FileSettingsStore) -> Self {
        Self {
            session: Session::new(api.clone()),
            api,
            settings,
            progress: ProgressStore::new(),
        }
    }
}
