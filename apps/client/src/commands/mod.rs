//! Terminal commands.
//!
//! Lines starting with `:` are commands; anything else is a spelling
//! attempt for the current word.

pub mod library;
pub mod settings;
pub mod stats;
pub mod study;

use std::path::PathBuf;

use crate::state::AppState;
use spelling_core::Difficulty;
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  :challenge [1-3]   start a timed challenge at a difficulty
  :learn [1-3]       study a batch of words
  :next / :prev      move between words
  :studied           mark the current word as studied (learning)
  :switch            turn the learning batch into a challenge
  :end               end the current round
  :reset             clear the current round
  :stats             word counts and words due today
  :progress          level, coins and mastery
  :review            list words due for review
  :mistakes          list words you have misspelled
  :clear-progress    wipe learning progress on the server
  :upload <file>     import a word list (one word|definition per line)
  :reclassify        re-run difficulty classification on uploaded words
  :format            delete every word in the library
  :settings          show settings (:settings reset for defaults)
  :set <name> <val>  change a setting
  :help              this message
  :quit              leave
Anything else is checked as your spelling of the current word.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Challenge(Difficulty),
    Learn(Difficulty),
    Next,
    Prev,
    Studied,
    Switch,
    End,
    Reset,
    Stats,
    Progress,
    Review,
    Mistakes,
    ClearProgress,
    Upload(PathBuf),
    Reclassify,
    Format { confirmed: bool },
    Settings,
    ResetSettings,
    Set { field: String, value: String },
    Help,
    Quit,
    Answer(String),
    Empty,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command :{0}, type :help for a list")]
    Unknown(String),

    #[error("difficulty must be 1, 2 or 3")]
    InvalidDifficulty,

    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Output of a command, plus whether the front-end should exit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            lines: vec!["Bye!".to_string()],
            quit: true,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Parse one input line.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Ok(Command::Answer(line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();

    let command = match name {
        "challenge" | "c" => Command::Challenge(parse_difficulty(parts.next())?),
        "learn" | "l" => Command::Learn(parse_difficulty(parts.next())?),
        "next" | "n" => Command::Next,
        "prev" | "p" => Command::Prev,
        "studied" | "s" => Command::Studied,
        "switch" => Command::Switch,
        "end" => Command::End,
        "reset" => Command::Reset,
        "stats" => Command::Stats,
        "progress" => Command::Progress,
        "review" => Command::Review,
        "mistakes" => Command::Mistakes,
        "clear-progress" => Command::ClearProgress,
        "upload" => {
            // Everything after the command name, so paths may contain spaces.
            let path = rest.trim_start()[name.len()..].trim();
            if path.is_empty() {
                return Err(CommandError::Usage(":upload <file>"));
            }
            Command::Upload(PathBuf::from(path))
        }
        "reclassify" => Command::Reclassify,
        "format" => match parts.next() {
            None => Command::Format { confirmed: false },
            Some("yes") => Command::Format { confirmed: true },
            Some(_) => return Err(CommandError::Usage(":format [yes]")),
        },
        "settings" => match parts.next() {
            None => Command::Settings,
            Some("reset") => Command::ResetSettings,
            Some(_) => return Err(CommandError::Usage(":settings [reset]")),
        },
        "set" => {
            const USAGE: &str = ":set <name> <value>";
            let field = parts.next().ok_or(CommandError::Usage(USAGE))?;
            let value = parts.next().ok_or(CommandError::Usage(USAGE))?;
            Command::Set {
                field: field.to_string(),
                value: value.to_string(),
            }
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(command)
}

/// Difficulty argument, defaulting to beginner when omitted.
fn parse_difficulty(arg: Option<&str>) -> Result<Difficulty, CommandError> {
    let Some(arg) = arg else {
        return Ok(Difficulty::Beginner);
    };
    arg.parse::<u8>()
        .ok()
        .and_then(Difficulty::from_value)
        .ok_or(CommandError::InvalidDifficulty)
}

/// Run a command against the application state.
pub async fn execute(state: &mut AppState, command: Command) -> Reply {
    match command {
        Command::Empty => Reply::default(),
        Command::Challenge(difficulty) => study::start_challenge(state, difficulty).await,
        Command::Learn(difficulty) => study::start_learning(state, difficulty).await,
        Command::Answer(input) => study::answer(state, &input).await,
        Command::Next => study::next(state),
        Command::Prev => study::prev(state),
        Command::Studied => study::mark_studied(state),
        Command::Switch => study::switch_to_challenge(state),
        Command::End => study::end(state).await,
        Command::Reset => study::reset(state),
        Command::Stats => stats::word_stats(state).await,
        Command::Progress => stats::progress(state).await,
        Command::Review => stats::review_words(state).await,
        Command::Mistakes => stats::error_words(state).await,
        Command::ClearProgress => stats::clear_progress(state).await,
        Command::Upload(path) => library::upload(state, &path).await,
        Command::Reclassify => library::reclassify(state).await,
        Command::Format { confirmed } => library::format(state, confirmed).await,
        Command::Settings => settings::show(state),
        Command::ResetSettings => settings::reset(state),
        Command::Set { field, value } => settings::set(state, &field, &value),
        Command::Help => Reply::line(HELP),
        Command::Quit => Reply::quit(),
    }
}
