//! HTTP client for the word service.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use spelling_core::{
    BackendError, Difficulty, Progress, ProgressTracker, ReviewCount, SpellCheck, SpellChecker,
    Word, WordId, WordProvider, WordStats,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Word lists can be large and are classified server-side.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct SpellCheckRequest<'a> {
    word_id: WordId,
    input: &'a str,
}

#[derive(Debug, Serialize)]
struct MarkStudiedRequest {
    word_id: WordId,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest<'a> {
    word_ids: &'a [WordId],
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    updated_count: usize,
}

/// Outcome of clearing learning progress.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearProgressResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cleared_count: usize,
}

/// Outcome of re-running difficulty classification on uploaded words.
#[derive(Debug, Clone, Deserialize)]
pub struct ReclassifyResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub updated: usize,
}

/// Outcome of deleting every word in the library.
#[derive(Debug, Clone, Deserialize)]
pub struct FormatResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub deleted_count: usize,
}

/// Outcome of importing a word list. `status` is `warning` when the file
/// held no usable lines.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub count: usize,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[allow(dead_code)]
    status: String,
}

/// Error body returned by the service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

struct ApiClientInner {
    client: Client,
    base_url: String,
}

/// Client for the word service API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Network(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Check if the service is reachable.
    pub async fn check_connectivity(&self) -> bool {
        self.word_stats().await.is_ok()
    }

    /// Words of a difficulty tier, at most `limit`.
    pub async fn words(&self, difficulty: Difficulty, limit: usize) -> Result<Vec<Word>, BackendError> {
        self.get(
            "/words",
            &[
                ("difficulty", difficulty.to_value().to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    /// Words due for review today.
    pub async fn review_words(&self, limit: usize) -> Result<Vec<Word>, BackendError> {
        self.get("/words/review", &[("limit", limit.to_string())])
            .await
    }

    /// Words the player has misspelled before.
    pub async fn error_words(&self, limit: usize) -> Result<Vec<Word>, BackendError> {
        self.get("/words/errors", &[("limit", limit.to_string())])
            .await
    }

    pub async fn check(&self, word_id: WordId, input: &str) -> Result<SpellCheck, BackendError> {
        self.post("/spell/check", &SpellCheckRequest { word_id, input })
            .await
    }

    pub async fn mark_word_studied(&self, word_id: WordId) -> Result<(), BackendError> {
        let _: StatusResponse = self
            .post("/progress/mark-studied", &MarkStudiedRequest { word_id })
            .await?;
        Ok(())
    }

    /// Mark several words as studied at once. Returns how many were updated.
    pub async fn batch_update_progress(&self, word_ids: &[WordId]) -> Result<usize, BackendError> {
        let response: BatchUpdateResponse = self
            .post("/progress/batch-update", &BatchUpdateRequest { word_ids })
            .await?;
        Ok(response.updated_count)
    }

    pub async fn progress(&self) -> Result<Progress, BackendError> {
        self.get("/progress", &[]).await
    }

    pub async fn word_stats(&self) -> Result<WordStats, BackendError> {
        self.get("/words/stats", &[]).await
    }

    pub async fn review_count(&self) -> Result<ReviewCount, BackendError> {
        self.get("/progress/review-count", &[]).await
    }

    /// Reset all learning progress and error counts.
    pub async fn clear_progress(&self) -> Result<ClearProgressResponse, BackendError> {
        self.post("/progress/clear", &serde_json::json!({})).await
    }

    /// Re-run difficulty classification on the uploaded words.
    pub async fn reclassify_words(&self) -> Result<ReclassifyResponse, BackendError> {
        self.post("/words/reclassify", &serde_json::json!({})).await
    }

    /// Delete every word in the library.
    pub async fn format_words(&self) -> Result<FormatResponse, BackendError> {
        self.post("/words/format", &serde_json::json!({})).await
    }

    /// Import a word list file: one `word|definition` pair per line, in a
    /// `.txt`, `.csv` or `.json` file.
    pub async fn upload_words(&self, path: &Path) -> Result<UploadResponse, UploadError> {
        let contents = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "words.txt".to_string());

        Ok(self.upload(file_name, contents).await?)
    }

    /// Import word list contents under the given file name.
    pub async fn upload(
        &self,
        file_name: String,
        contents: Vec<u8>,
    ) -> Result<UploadResponse, BackendError> {
        tracing::debug!(%file_name, bytes = contents.len(), "uploading word list");
        let form = Form::new().part("file", Part::bytes(contents).file_name(file_name));

        let resp = self
            .inner
            .client
            .post(self.url("/words/upload"))
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(send_error)?;

        read_json(resp).await
    }

    // === Private methods ===

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let resp = self
            .inner
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(send_error)?;

        read_json(resp).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let resp = self
            .inner
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(send_error)?;

        read_json(resp).await
    }
}

fn send_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Network(e.to_string())
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body);
        tracing::warn!(status = status.as_u16(), %message, "API request failed");
        return Err(BackendError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    resp.json().await.map_err(|e| {
        if e.is_timeout() {
            BackendError::Timeout
        } else {
            BackendError::Parse(e.to_string())
        }
    })
}

/// Pull the `detail` field out of an error body, falling back to the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.to_string(),
    }
}

impl WordProvider for ApiClient {
    async fn fetch_words(&self, difficulty: Difficulty, limit: usize) -> Result<Vec<Word>, BackendError> {
        self.words(difficulty, limit).await
    }
}

impl SpellChecker for ApiClient {
    async fn check_spelling(&self, word_id: WordId, input: &str) -> Result<SpellCheck, BackendError> {
        self.check(word_id, input).await
    }
}

impl ProgressTracker for ApiClient {
    async fn mark_studied(&self, word_id: WordId) -> Result<(), BackendError> {
        self.mark_word_studied(word_id).await
    }
}
