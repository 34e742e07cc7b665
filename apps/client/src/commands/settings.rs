//! Settings commands.

use super::Reply;
use crate::settings::{set_field, SettingsStore};
use crate::state::AppState;

pub fn show(state: &AppState) -> Reply {
    let s = state.settings.load();
    let mut reply = Reply::line(format!("Settings ({}):", state.settings.path().display()));
    reply.push(format!("  initial_lives = {}", s.initial_lives));
    reply.push(format!("  time_limit = {}", s.time_limit));
    reply.push(format!("  words_per_round = {}", s.words_per_round));
    reply.push(format!("  points_per_correct = {}", s.points_per_correct));
    reply.push(format!("  enable_sound = {}", s.enable_sound));
    reply.push(format!("  auto_play_audio = {}", s.auto_play_audio));
    reply
}

pub fn set(state: &AppState, field: &str, value: &str) -> Reply {
    let mut settings = state.settings.load();
    if let Err(e) = set_field(&mut settings, field, value) {
        return Reply::line(e.to_string());
    }
    match state.settings.save(&settings) {
        Ok(()) => Reply::line(format!("{field} = {value}, applies from the next round.")),
        Err(e) => Reply::line(format!("Could not save settings: {e}")),
    }
}

pub fn reset(state: &AppState) -> Reply {
    match state.settings.reset() {
        Ok(_) => {
            let mut reply = Reply::line("Settings restored to defaults.");
            reply.lines.extend(show(state).lines.into_iter().skip(1));
            reply
        }
        Err(e) => Reply::line(format!("Could not reset settings: {e}")),
    }
}
