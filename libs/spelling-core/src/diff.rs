//! Character diff and hints for typed spellings.
//!
//! Comparison is case-insensitive and ignores surrounding whitespace. The
//! diff is strictly positional: character `i` of the input is compared with
//! character `i` of the target, so an insertion near the start shifts every
//! later character into a mismatch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a run of characters in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// Same character in input and target.
    Match,
    /// Input character that differs from, or goes past, the target.
    Mismatch,
    /// Target character the input does not reach.
    Missing,
}

/// A run of characters sharing one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub text: String,
    pub status: DiffStatus,
}

impl DiffSegment {
    fn new(status: DiffStatus, c: char) -> Self {
        Self {
            text: c.to_string(),
            status,
        }
    }
}

/// Normalize a spelling for comparison (trim and lowercase).
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Whether the input spells the target, ignoring case and surrounding whitespace.
pub fn is_match(input: &str, target: &str) -> bool {
    fold(input) == fold(target)
}

/// Compare input against target position by position.
///
/// Identical folded strings yield a single `Match` segment. Otherwise each
/// position up to the longer length is tagged and adjacent positions with
/// the same status are merged.
pub fn highlight(input: &str, target: &str) -> Vec<DiffSegment> {
    let input = fold(input);
    let target = fold(target);

    if input == target {
        return vec![DiffSegment {
            text: input,
            status: DiffStatus::Match,
        }];
    }

    let input_chars: Vec<char> = input.chars().collect();
    let target_chars: Vec<char> = target.chars().collect();
    let max_len = input_chars.len().max(target_chars.len());

    let mut result: Vec<DiffSegment> = Vec::new();

    for i in 0..max_len {
        let (status, c) = match (input_chars.get(i), target_chars.get(i)) {
            (Some(&typed), Some(&expected)) if typed == expected => (DiffStatus::Match, typed),
            (Some(&typed), _) => (DiffStatus::Mismatch, typed),
            (None, Some(&expected)) => (DiffStatus::Missing, expected),
            (None, None) => break,
        };

        match result.last_mut() {
            Some(last) if last.status == status => last.text.push(c),
            _ => result.push(DiffSegment::new(status, c)),
        }
    }

    result
}

/// A short hint about what is wrong with a spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "snake_case")]
pub enum Hint {
    /// The input is this many letters short.
    Missing(usize),
    /// The input has this many letters too many.
    Extra(usize),
    /// Lengths agree; the letter at this 1-based position is wrong.
    WrongLetter(usize),
    /// Nothing specific to point at.
    CheckSpelling,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(1) => write!(f, "Hint: the word is missing 1 letter"),
            Self::Missing(n) => write!(f, "Hint: the word is missing {n} letters"),
            Self::Extra(1) => write!(f, "Hint: the word has 1 extra letter"),
            Self::Extra(n) => write!(f, "Hint: the word has {n} extra letters"),
            Self::WrongLetter(i) => write!(f, "Hint: letter {i} is wrong"),
            Self::CheckSpelling => write!(f, "Hint: check your spelling"),
        }
    }
}

/// Work out a hint for the input against the target.
///
/// Length differences take priority, then the first differing position.
pub fn hint(input: &str, target: &str) -> Hint {
    let input: Vec<char> = fold(input).chars().collect();
    let target: Vec<char> = fold(target).chars().collect();

    if input.len() < target.len() {
        return Hint::Missing(target.len() - input.len());
    }
    if input.len() > target.len() {
        return Hint::Extra(input.len() - target.len());
    }

    input
        .iter()
        .zip(&target)
        .position(|(typed, expected)| typed != expected)
        .map(|i| Hint::WrongLetter(i + 1))
        .unwrap_or(Hint::CheckSpelling)
}
