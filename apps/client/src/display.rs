//! Plain-text rendering for the terminal.

use chrono::NaiveDate;
use spelling_core::{DiffSegment, DiffStatus, Progress, SessionMode, SessionSnapshot, Word};

/// Render a diff: mismatched input in `[..]`, missing letters in `(..)`.
pub fn render_diff(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment.status {
            DiffStatus::Match => segment.text.clone(),
            DiffStatus::Mismatch => format!("[{}]", segment.text),
            DiffStatus::Missing => format!("({})", segment.text),
        })
        .collect()
}

/// The prompt for the current word, if there is one.
///
/// Learning shows the spelling alongside the definition; a challenge only
/// shows the definition.
pub fn render_prompt(snapshot: &SessionSnapshot, studied: bool) -> Option<String> {
    let word = snapshot.current_word.as_ref()?;
    let counter = format!("[{}/{}]", snapshot.position + 1, snapshot.word_count);

    match snapshot.mode {
        SessionMode::Learning => {
            let mark = if studied { " *" } else { "" };
            Some(format!("{counter} {} - {}{mark}", word.word, word.definition))
        }
        SessionMode::Challenge => Some(format!(
            "{counter} {}  (lives {}, score {}, {}s left)",
            word.definition, snapshot.lives, snapshot.score, snapshot.time_remaining
        )),
        SessionMode::Idle | SessionMode::Ended => None,
    }
}

pub fn render_summary(snapshot: &SessionSnapshot) -> String {
    format!(
        "Round over: score {}, {}/{} correct ({}%)",
        snapshot.score, snapshot.correct_count, snapshot.total_count, snapshot.accuracy_percent
    )
}

/// One line of a word listing.
pub fn render_word_line(word: &Word, today: NaiveDate) -> String {
    let due = match word.next_review {
        Some(date) if date <= today => " (due)".to_string(),
        Some(date) => format!(" (next {date})"),
        None => String::new(),
    };
    let errors = if word.error_count > 0 {
        format!(", {} errors", word.error_count)
    } else {
        String::new()
    };
    format!(
        "  {} - {} [level {}{errors}]{due}",
        word.word, word.definition, word.difficulty
    )
}

pub fn render_progress(progress: &Progress) -> String {
    let mut mastery: Vec<_> = progress.mastery.iter().collect();
    mastery.sort();
    let mastery = mastery
        .into_iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Level {}, {} coins, mastery {{{mastery}}}",
        progress.level, progress.coins
    )
}
