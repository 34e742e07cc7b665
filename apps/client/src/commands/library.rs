//! Word library maintenance commands.

use std::path::Path;

use super::Reply;
use crate::state::AppState;

pub async fn upload(state: &mut AppState, path: &Path) -> Reply {
    match state.api.upload_words(path).await {
        Ok(response) => {
            let mut reply = Reply::line(
                response
                    .message
                    .unwrap_or_else(|| format!("Imported {} words.", response.count)),
            );
            if response.count > 0 {
                reply.push("Use :stats to see the new word counts.");
            }
            reply
        }
        Err(e) => Reply::line(format!("Upload failed: {e}")),
    }
}

pub async fn reclassify(state: &mut AppState) -> Reply {
    match state.api.reclassify_words().await {
        Ok(response) => Reply::line(
            response
                .message
                .unwrap_or_else(|| format!("Reclassified words, {} changed tier.", response.updated)),
        ),
        Err(e) => Reply::line(format!("Could not reclassify words: {e}")),
    }
}

/// Delete the whole word library. Needs an explicit `:format yes`.
pub async fn format(state: &mut AppState, confirmed: bool) -> Reply {
    if !confirmed {
        return Reply::line("This deletes every word in the library. Type :format yes to confirm.");
    }

    match state.api.format_words().await {
        Ok(response) => {
            // The running round refers to words that no longer exist.
            state.session.reset();
            Reply::line(
                response
                    .message
                    .unwrap_or_else(|| format!("Deleted {} words.", response.deleted_count)),
            )
        }
        Err(e) => Reply::line(format!("Could not clear the word library: {e}")),
    }
}
