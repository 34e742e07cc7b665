//! Persisted game settings.

use spelling_core::{GameSettings, SettingsProvider};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown setting: {0}")]
    UnknownField(String),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Storage for game settings.
pub trait SettingsStore {
    /// Load settings, falling back to defaults when nothing usable is stored.
    fn load(&self) -> GameSettings;

    fn save(&self, settings: &GameSettings) -> Result<(), SettingsError>;

    /// Restore and persist the default settings.
    fn reset(&self) -> Result<GameSettings, SettingsError> {
        let settings = GameSettings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

/// Settings kept in a JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Default location in the user's local data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("spelling-game")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> GameSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return GameSettings::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read settings");
                return GameSettings::default();
            }
        };

        match serde_json::from_slice::<GameSettings>(&bytes) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to parse settings");
                GameSettings::default()
            }
        }
    }

    fn save(&self, settings: &GameSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl SettingsProvider for FileSettingsStore {
    fn game_settings(&self) -> GameSettings {
        self.load()
    }
}

/// Names accepted by [`set_field`].
pub const FIELDS: &[&str] = &[
    "initial_lives",
    "time_limit",
    "words_per_round",
    "points_per_correct",
    "enable_sound",
    "auto_play_audio",
];

/// Update one setting from its textual value.
pub fn set_field(settings: &mut GameSettings, field: &str, value: &str) -> Result<(), SettingsError> {
    let invalid = || SettingsError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    };
    let positive = || match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid()),
    };
    let flag = || match value {
        "true" | "on" | "yes" | "1" => Ok(true),
        "false" | "off" | "no" | "0" => Ok(false),
        _ => Err(invalid()),
    };

    match field {
        "initial_lives" => settings.initial_lives = positive()?,
        "time_limit" => settings.time_limit = positive()?,
        "words_per_round" => settings.words_per_round = positive()?,
        "points_per_correct" => settings.points_per_correct = positive()?,
        "enable_sound" => settings.enable_sound = flag()?,
        "auto_play_audio" => settings.auto_play_audio = flag()?,
        other => return Err(SettingsError::UnknownField(other.to_string())),
    }
    Ok(())
}
