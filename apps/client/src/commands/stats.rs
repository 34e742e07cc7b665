//! Word statistics and progress commands.

use super::Reply;
use crate::display::{render_progress, render_word_line};
use crate::state::AppState;
use spelling_core::Word;

/// How many words the review and mistake lists show.
const LIST_LIMIT: usize = 20;

pub async fn word_stats(state: &mut AppState) -> Reply {
    let stats = match state.api.word_stats().await {
        Ok(stats) => stats,
        Err(e) => return Reply::line(format!("Could not load word stats: {e}")),
    };

    let mut reply = Reply::line(format!(
        "Words: level 1 {}, level 2 {}, level 3 {} (total {})",
        stats.level1, stats.level2, stats.level3, stats.total
    ));
    match state.api.review_count().await {
        Ok(due) => reply.push(format!("{} words due for review on {}", due.count, due.date)),
        Err(e) => tracing::warn!(error = %e, "failed to fetch review count"),
    }
    reply
}

pub async fn progress(state: &mut AppState) -> Reply {
    let fresh = state.progress.refresh(&state.api).await;
    let mut reply = Reply::line(render_progress(state.progress.progress()));
    if !fresh {
        reply.push("(could not reach the server, showing last known progress)");
    }
    reply
}

pub async fn review_words(state: &mut AppState) -> Reply {
    match state.api.review_words(LIST_LIMIT).await {
        Ok(words) if words.is_empty() => Reply::line("Nothing is due for review."),
        Ok(words) => word_list("Due for review:", &words),
        Err(e) => Reply::line(format!("Could not load review words: {e}")),
    }
}

pub async fn error_words(state: &mut AppState) -> Reply {
    match state.api.error_words(LIST_LIMIT).await {
        Ok(words) if words.is_empty() => Reply::line("No misspelled words yet."),
        Ok(words) => word_list("Words you have misspelled:", &words),
        Err(e) => Reply::line(format!("Could not load misspelled words: {e}")),
    }
}

pub async fn clear_progress(state: &mut AppState) -> Reply {
    match state.api.clear_progress().await {
        Ok(response) => {
            state.progress.refresh(&state.api).await;
            Reply::line(
                response
                    .message
                    .unwrap_or_else(|| format!("Cleared {} progress records.", response.cleared_count)),
            )
        }
        Err(e) => Reply::line(format!("Could not clear progress: {e}")),
    }
}

fn word_list(title: &str, words: &[Word]) -> Reply {
    let today = chrono::Local::now().date_naive();
    let mut reply = Reply::line(title);
    for word in words {
        reply.push(render_word_line(word, today));
    }
    reply
}
