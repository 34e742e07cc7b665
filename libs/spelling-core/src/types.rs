//! Core types for the spelling game.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Word identifier assigned by the word service.
pub type WordId = i64;

/// Difficulty tier of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

impl Difficulty {
    /// Convert to tier number (1-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
        }
    }

    /// Create from tier number.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Beginner),
            2 => Some(Self::Intermediate),
            3 => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("difficulty must be 1, 2 or 3, got {value}"))
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> Self {
        difficulty.to_value()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// A word as served by the word service. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    /// Target spelling.
    pub word: String,
    /// Display form shown to the player.
    #[serde(rename = "zh_definition")]
    pub definition: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub mastery_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
    #[serde(default)]
    pub error_count: u32,
}

/// Verdict returned by the spell checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellCheck {
    pub correct: bool,
    /// Canonical spelling of the word.
    pub correct_word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_review: Option<NaiveDate>,
    #[serde(default)]
    pub mastery_level: u8,
}

/// Player-tunable game settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub initial_lives: u32,
    /// Challenge time limit in seconds.
    pub time_limit: u32,
    pub words_per_round: u32,
    pub points_per_correct: u32,
    pub enable_sound: bool,
    pub auto_play_audio: bool,
}

impl GameSettings {
    pub const DEFAULT_LIVES: u32 = 3;
    pub const DEFAULT_TIME_LIMIT: u32 = 90;
    pub const DEFAULT_WORDS_PER_ROUND: u32 = 10;
    pub const DEFAULT_POINTS_PER_CORRECT: u32 = 10;

    /// Replace zero numeric values with their defaults.
    pub fn normalized(self) -> Self {
        fn or_default(value: u32, default: u32) -> u32 {
            if value == 0 {
                default
            } else {
                value
            }
        }

        Self {
            initial_lives: or_default(self.initial_lives, Self::DEFAULT_LIVES),
            time_limit: or_default(self.time_limit, Self::DEFAULT_TIME_LIMIT),
            words_per_round: or_default(self.words_per_round, Self::DEFAULT_WORDS_PER_ROUND),
            points_per_correct: or_default(self.points_per_correct, Self::DEFAULT_POINTS_PER_CORRECT),
            ..self
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            initial_lives: Self::DEFAULT_LIVES,
            time_limit: Self::DEFAULT_TIME_LIMIT,
            words_per_round: Self::DEFAULT_WORDS_PER_ROUND,
            points_per_correct: Self::DEFAULT_POINTS_PER_CORRECT,
            enable_sound: true,
            auto_play_audio: false,
        }
    }
}

/// Learning progress summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub level: u32,
    pub coins: u32,
    /// Word counts per mastery tier label.
    #[serde(default)]
    pub mastery: HashMap<String, u32>,
}

/// Word counts per difficulty tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    pub level1: u32,
    pub level2: u32,
    pub level3: u32,
    pub total: u32,
}

/// Number of words due for review today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCount {
    pub count: u32,
    pub date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_difficulty_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Difficulty::Advanced).unwrap(), "3");
        let parsed: Difficulty = serde_json::from_str("2").unwrap();
        assert_eq!(parsed, Difficulty::Intermediate);
    }

    #[test]
    fn test_difficulty_rejects_out_of_range() {
        assert!(serde_json::from_str::<Difficulty>("0").is_err());
        assert!(serde_json::from_str::<Difficulty>("4").is_err());
    }

    #[test]
    fn test_word_parses_service_payload() {
        let json = r#"{
            "id": 7,
            "word": "apple",
            "zh_definition": "苹果",
            "difficulty": 1,
            "category": null,
            "audio_url": null,
            "mastery_level": 2,
            "next_review": "2024-03-01",
            "error_count": 1
        }"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.id, 7);
        assert_eq!(word.definition, "苹果");
        assert_eq!(word.difficulty, Difficulty::Beginner);
        assert_eq!(word.next_review, NaiveDate::from_ymd_opt(2024, 3, 1));
    }

    #[test]
    fn test_word_defaults_optional_progress_fields() {
        let json = r#"{"id": 1, "word": "cat", "zh_definition": "猫", "difficulty": 1}"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.mastery_level, 0);
        assert_eq!(word.error_count, 0);
        assert_eq!(word.category, None);
    }

    #[test]
    fn test_settings_fill_missing_fields() {
        let settings: GameSettings = serde_json::from_str(r#"{"time_limit": 60}"#).unwrap();
        assert_eq!(settings.time_limit, 60);
        assert_eq!(settings.initial_lives, 3);
        assert!(settings.enable_sound);
    }

    #[test]
    fn test_normalized_replaces_zero_values() {
        let settings = GameSettings {
            initial_lives: 0,
            time_limit: 30,
            words_per_round: 0,
            points_per_correct: 5,
            enable_sound: false,
            auto_play_audio: true,
        }
        .normalized();

        assert_eq!(
            settings,
            GameSettings {
                initial_lives: 3,
                time_limit: 30,
                words_per_round: 10,
                points_per_correct: 5,
                enable_sound: false,
                auto_play_audio: true,
            }
        );
    }
}
