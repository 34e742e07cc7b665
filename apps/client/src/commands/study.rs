//! Learning and challenge round commands.

use super::Reply;
use crate::display::{render_diff, render_prompt, render_summary};
use crate::state::AppState;
use spelling_core::{highlight, hint, Difficulty, SessionMode};

/// Start a timed challenge.
pub async fn start_challenge(state: &mut AppState, difficulty: Difficulty) -> Reply {
    if let Err(e) = state
        .session
        .start_challenge(difficulty, &state.settings)
        .await
    {
        return Reply::line(format!("Could not start the challenge: {e}"));
    }

    let settings = state.session.settings();
    let mut reply = Reply::line(format!(
        "Challenge started: {} words, {} lives, {}s on the clock.",
        state.session.words().len(),
        settings.initial_lives,
        settings.time_limit
    ));
    push_prompt(state, &mut reply);
    reply
}

/// Start a learning session.
pub async fn start_learning(state: &mut AppState, difficulty: Difficulty) -> Reply {
    if let Err(e) = state
        .session
        .start_learning(difficulty, &state.settings)
        .await
    {
        return Reply::line(format!("Could not start learning: {e}"));
    }

    let mut reply = Reply::line(format!(
        "Learning {} words. Use :next, :prev and :studied, then :switch for a challenge.",
        state.session.words().len()
    ));
    push_prompt(state, &mut reply);
    reply
}

/// Check a spelling attempt for the current word.
pub async fn answer(state: &mut AppState, input: &str) -> Reply {
    match state.session.mode() {
        SessionMode::Idle => return Reply::line("Start a round first: :challenge 1 or :learn 1"),
        SessionMode::Ended => {
            return Reply::line("This round is over. Start a new one with :challenge or :learn")
        }
        SessionMode::Learning | SessionMode::Challenge => {}
    }
    let was_challenge = state.session.mode() == SessionMode::Challenge;

    let Some(verdict) = state.session.submit_answer(input).await else {
        let message = state
            .session
            .last_error()
            .unwrap_or("There is no word to answer.")
            .to_string();
        return Reply::line(message);
    };

    let mut reply = Reply::default();
    if verdict.correct {
        reply.push(format!(
            "Correct! +{} points",
            state.session.settings().points_per_correct
        ));
    } else {
        reply.push(format!(
            "Not quite: {}",
            render_diff(&highlight(input, &verdict.correct_word))
        ));
        reply.push(hint(input, &verdict.correct_word).to_string());
        reply.push(format!("Correct spelling: {}", verdict.correct_word));
    }

    if state.session.mode() == SessionMode::Challenge {
        state.session.advance();
    }
    finish_round(state, was_challenge, &mut reply);
    push_prompt(state, &mut reply);
    reply
}

pub fn next(state: &mut AppState) -> Reply {
    let mode = state.session.mode();
    if matches!(mode, SessionMode::Idle | SessionMode::Ended) {
        return Reply::line("No round in progress.");
    }

    let mut reply = Reply::default();
    if mode == SessionMode::Learning && state.session.is_last_word() {
        reply.push("That was the last word. Use :switch to take the challenge.");
    }
    state.session.advance();
    finish_round(state, mode == SessionMode::Challenge, &mut reply);
    push_prompt(state, &mut reply);
    reply
}

pub fn prev(state: &mut AppState) -> Reply {
    if matches!(
        state.session.mode(),
        SessionMode::Idle | SessionMode::Ended
    ) {
        return Reply::line("No round in progress.");
    }

    state.session.retreat();
    let mut reply = Reply::default();
    push_prompt(state, &mut reply);
    reply
}

pub fn mark_studied(state: &mut AppState) -> Reply {
    if state.session.mode() != SessionMode::Learning {
        return Reply::line("Words can only be marked as studied while learning.");
    }
    let Some(word) = state.session.current_word().map(|w| w.word.clone()) else {
        return Reply::line("There is no word to mark.");
    };

    let inserted = state.session.mark_current_studied();
    let studied = state.session.studied_words().len();
    let total = state.session.words().len();
    if inserted {
        Reply::line(format!("Marked '{word}' as studied ({studied}/{total})."))
    } else {
        Reply::line(format!("'{word}' is already studied ({studied}/{total})."))
    }
}

pub fn switch_to_challenge(state: &mut AppState) -> Reply {
    if !state.session.switch_to_challenge() {
        return Reply::line("Switching needs a learning session, start one with :learn.");
    }

    let mut reply = Reply::line(format!(
        "Challenge on the same {} words, {}s on the clock.",
        state.session.words().len(),
        state.session.time_remaining()
    ));
    push_prompt(state, &mut reply);
    reply
}

/// End the round. A learning session's studied words are saved in one batch.
pub async fn end(state: &mut AppState) -> Reply {
    let mode = state.session.mode();
    let mut reply = Reply::default();

    match mode {
        SessionMode::Idle => return Reply::line("No round in progress."),
        SessionMode::Ended => return Reply::line("The round is already over."),
        SessionMode::Learning => {
            let mut ids: Vec<_> = state.session.studied_words().iter().copied().collect();
            ids.sort_unstable();
            if !ids.is_empty() {
                match state.api.batch_update_progress(&ids).await {
                    Ok(updated) => reply.push(format!("Saved {updated} studied words.")),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to save studied words");
                        reply.push(format!("Could not save study progress: {e}"));
                    }
                }
            }
            state.session.end_session();
            reply.push(format!(
                "Learning session ended, {} of {} words studied.",
                ids.len(),
                state.session.words().len()
            ));
        }
        SessionMode::Challenge => {
            state.session.end_session();
            finish_round(state, true, &mut reply);
        }
    }

    reply
}

pub fn reset(state: &mut AppState) -> Reply {
    state.session.reset();
    Reply::line("Round cleared.")
}

/// Count down one second of a running challenge.
pub fn tick(state: &mut AppState) -> Reply {
    let mut reply = Reply::default();
    if state.session.mode() != SessionMode::Challenge {
        return reply;
    }

    let remaining = state.session.tick();
    if state.session.is_ended() {
        reply.push("Time's up!");
        finish_round(state, true, &mut reply);
    } else if remaining <= 5 || remaining % 30 == 0 {
        reply.push(format!("{remaining}s left"));
    }
    reply
}

/// Wrap up a challenge that ended during this command.
fn finish_round(state: &mut AppState, was_challenge: bool, reply: &mut Reply) {
    if !was_challenge || !state.session.is_ended() {
        return;
    }

    let snapshot = state.session.snapshot();
    state.progress.add_coins(snapshot.score);
    reply.push(render_summary(&snapshot));
    reply.push(format!("Coins: {}", state.progress.coins()));
}

fn push_prompt(state: &AppState, reply: &mut Reply) {
    let studied = state
        .session
        .current_word()
        .is_some_and(|w| state.session.is_studied(w.id));
    if let Some(prompt) = render_prompt(&state.session.snapshot(), studied) {
        reply.push(prompt);
    }
}
