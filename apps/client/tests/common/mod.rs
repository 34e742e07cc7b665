//! Common test utilities for integration tests.
//!
//! This module provides an in-process fake of the word service:
//! - FakeService holding scripted words and recording calls
//! - spawn_service to serve it on an ephemeral port
//! - Helpers for building clients and word fixtures

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use spelling_client::api::ApiClient;
use spelling_core::{Difficulty, Progress, Word, WordId};

/// Shared state of the fake service.
#[derive(Default)]
pub struct FakeService {
    pub words: Mutex<Vec<Word>>,
    /// Number of upcoming word requests to fail with a 503.
    pub fail_word_requests: AtomicUsize,
    pub word_requests: AtomicUsize,
    pub check_requests: AtomicUsize,
    pub slow_stats: AtomicBool,
    pub marked: Mutex<Vec<WordId>>,
    pub batches: Mutex<Vec<Vec<WordId>>>,
    pub progress: Mutex<Progress>,
    pub cleared: AtomicBool,
}

impl FakeService {
    pub fn with_words(words: Vec<Word>) -> Arc<Self> {
        let service = Self::default();
        *service.words.lock().unwrap() = words;
        *service.progress.lock().unwrap() = Progress {
            level: 2,
            coins: 150,
            mastery: HashMap::from([("green".to_string(), 15), ("red".to_string(), 4)]),
        };
        Arc::new(service)
    }

    pub fn word_requests(&self) -> usize {
        self.word_requests.load(Ordering::SeqCst)
    }

    pub fn check_requests(&self) -> usize {
        self.check_requests.load(Ordering::SeqCst)
    }

    pub fn marked(&self) -> Vec<WordId> {
        self.marked.lock().unwrap().clone()
    }

    pub fn batches(&self) -> Vec<Vec<WordId>> {
        self.batches.lock().unwrap().clone()
    }
}

/// Build a word fixture.
pub fn word(id: WordId, spelling: &str, definition: &str, difficulty: Difficulty) -> Word {
    Word {
        id,
        word: spelling.to_string(),
        definition: definition.to_string(),
        difficulty,
        category: None,
        audio_url: None,
        mastery_level: 0,
        next_review: None,
        error_count: 0,
    }
}

/// Three beginner words and one intermediate word; no advanced words.
pub fn sample_words() -> Vec<Word> {
    vec![
        word(1, "apple", "苹果", Difficulty::Beginner),
        word(2, "banana", "香蕉", Difficulty::Beginner),
        word(3, "cherry", "樱桃", Difficulty::Beginner),
        word(4, "zebra", "斑马", Difficulty::Intermediate),
    ]
}

/// Serve the fake on 127.0.0.1 and return its API base url.
pub async fn spawn_service(service: Arc<FakeService>) -> String {
    let app = Router::new()
        .route("/api/words", get(words))
        .route("/api/words/review", get(review_words))
        .route("/api/words/errors", get(error_words))
        .route("/api/words/stats", get(word_stats))
        .route("/api/words/upload", post(upload_words))
        .route("/api/words/reclassify", post(reclassify_words))
        .route("/api/words/format", post(format_words))
        .route("/api/spell/check", post(check_spelling))
        .route("/api/progress", get(progress))
        .route("/api/progress/mark-studied", post(mark_studied))
        .route("/api/progress/batch-update", post(batch_update))
        .route("/api/progress/review-count", get(review_count))
        .route("/api/progress/clear", post(clear_progress))
        .with_state(service);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake service stopped");
    });

    format!("http://{}/api", addr)
}

/// Client for a base url with a short timeout.
pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_millis(500)).expect("Failed to build client")
}

/// Base url of a port nothing is listening on.
pub async fn closed_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{}/api", addr)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Deserialize)]
struct WordsQuery {
    difficulty: u8,
    limit: usize,
}

#[derive(Deserialize)]
struct LimitQuery {
    limit: usize,
}

async fn words(State(service): State<Arc<FakeService>>, Query(query): Query<WordsQuery>) -> Response {
    service.word_requests.fetch_add(1, Ordering::SeqCst);

    let pending_failures = service.fail_word_requests.load(Ordering::SeqCst);
    if pending_failures > 0 {
        service
            .fail_word_requests
            .store(pending_failures - 1, Ordering::SeqCst);
        return detail(StatusCode::SERVICE_UNAVAILABLE, "database is busy");
    }

    let Some(difficulty) = Difficulty::from_value(query.difficulty) else {
        return detail(StatusCode::BAD_REQUEST, "difficulty must be 1, 2 or 3");
    };

    let words: Vec<Word> = service
        .words
        .lock()
        .unwrap()
        .iter()
        .filter(|w| w.difficulty == difficulty)
        .take(query.limit)
        .cloned()
        .collect();
    Json(words).into_response()
}

async fn review_words(
    State(service): State<Arc<FakeService>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Word>> {
    let today = chrono::Local::now().date_naive();
    let words = service
        .words
        .lock()
        .unwrap()
        .iter()
        .take(query.limit)
        .map(|w| Word {
            next_review: Some(today),
            ..w.clone()
        })
        .collect();
    Json(words)
}

async fn error_words(
    State(service): State<Arc<FakeService>>,
    Query(query): Query<LimitQuery>,
) -> Json<Vec<Word>> {
    let words = service
        .words
        .lock()
        .unwrap()
        .iter()
        .filter(|w| w.error_count > 0)
        .take(query.limit)
        .cloned()
        .collect();
    Json(words)
}

async fn word_stats(State(service): State<Arc<FakeService>>) -> Response {
    if service.slow_stats.load(Ordering::SeqCst) {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    let words = service.words.lock().unwrap().clone();
    let count = |d: Difficulty| words.iter().filter(|w| w.difficulty == d).count();
    Json(json!({
        "level1": count(Difficulty::Beginner),
        "level2": count(Difficulty::Intermediate),
        "level3": count(Difficulty::Advanced),
        "total": words.len(),
    }))
    .into_response()
}

#[derive(Deserialize)]
struct CheckRequest {
    word_id: WordId,
    input: String,
}

async fn check_spelling(
    State(service): State<Arc<FakeService>>,
    Json(request): Json<CheckRequest>,
) -> Response {
    service.check_requests.fetch_add(1, Ordering::SeqCst);

    let target = service
        .words
        .lock()
        .unwrap()
        .iter()
        .find(|w| w.id == request.word_id)
        .map(|w| w.word.clone());
    let Some(target) = target else {
        return detail(StatusCode::NOT_FOUND, "word not found");
    };

    let correct = request.input.trim().to_lowercase() == target.to_lowercase();
    Json(json!({
        "correct": correct,
        "correct_word": target,
        "next_review": null,
        "mastery_level": if correct { 1 } else { 0 },
    }))
    .into_response()
}

async fn progress(State(service): State<Arc<FakeService>>) -> Json<Progress> {
    Json(service.progress.lock().unwrap().clone())
}

#[derive(Deserialize)]
struct MarkRequest {
    word_id: WordId,
}

async fn mark_studied(
    State(service): State<Arc<FakeService>>,
    Json(request): Json<MarkRequest>,
) -> Response {
    let known = service
        .words
        .lock()
        .unwrap()
        .iter()
        .any(|w| w.id == request.word_id);
    if !known {
        return detail(StatusCode::NOT_FOUND, "word not found");
    }

    service.marked.lock().unwrap().push(request.word_id);
    Json(json!({ "status": "success", "message": "marked as studied", "next_review": null }))
        .into_response()
}

#[derive(Deserialize)]
struct BatchRequest {
    word_ids: Vec<WordId>,
}

async fn batch_update(
    State(service): State<Arc<FakeService>>,
    Json(request): Json<BatchRequest>,
) -> Response {
    let updated = request.word_ids.len();
    service.batches.lock().unwrap().push(request.word_ids);
    Json(json!({
        "status": "success",
        "message": format!("updated {updated} words"),
        "updated_count": updated,
    }))
    .into_response()
}

async fn review_count(State(service): State<Arc<FakeService>>) -> Response {
    let count = service.words.lock().unwrap().len();
    Json(json!({ "count": count, "date": "2024-05-02" })).into_response()
}

async fn clear_progress(State(service): State<Arc<FakeService>>) -> Response {
    service.cleared.store(true, Ordering::SeqCst);
    *service.progress.lock().unwrap() = Progress {
        level: 1,
        coins: 0,
        mastery: HashMap::new(),
    };
    Json(json!({ "status": "success", "message": "progress cleared", "cleared_count": 4 }))
        .into_response()
}

/// Stand-in for the service's difficulty classifier: longer words are harder.
pub fn classify(spelling: &str) -> Difficulty {
    match spelling.chars().count() {
        0..=5 => Difficulty::Beginner,
        6..=8 => Difficulty::Intermediate,
        _ => Difficulty::Advanced,
    }
}

async fn upload_words(State(service): State<Arc<FakeService>>, mut multipart: Multipart) -> Response {
    let mut upload = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let Ok(bytes) = field.bytes().await else {
            return detail(StatusCode::BAD_REQUEST, "unreadable upload");
        };
        upload = Some((file_name, bytes));
    }

    let Some((file_name, bytes)) = upload else {
        return detail(StatusCode::UNPROCESSABLE_ENTITY, "file is required");
    };
    if ![".txt", ".csv", ".json"].iter().any(|ext| file_name.ends_with(ext)) {
        return detail(StatusCode::BAD_REQUEST, "only txt, csv and json files are supported");
    }
    let Ok(text) = String::from_utf8(bytes.to_vec()) else {
        return detail(StatusCode::BAD_REQUEST, "file must be UTF-8 encoded");
    };

    let mut words = service.words.lock().unwrap();
    let mut next_id = words.iter().map(|w| w.id).max().unwrap_or(0) + 1;
    let (mut added, mut skipped, mut invalid) = (0, 0, 0);

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((spelling, definition)) = line.split_once('|') else {
            invalid += 1;
            continue;
        };
        let (spelling, definition) = (spelling.trim().to_lowercase(), definition.trim());
        if spelling.is_empty() || definition.is_empty() {
            invalid += 1;
            continue;
        }
        if words.iter().any(|w| w.word == spelling) {
            skipped += 1;
            continue;
        }
        words.push(word(next_id, &spelling, definition, classify(&spelling)));
        next_id += 1;
        added += 1;
    }

    if added + skipped == 0 {
        return Json(json!({
            "status": "warning",
            "count": 0,
            "message": format!("no valid words, {invalid} invalid lines"),
        }))
        .into_response();
    }

    Json(json!({
        "status": "success",
        "count": added,
        "message": format!(
            "imported {added} words, skipped {skipped} duplicates, ignored {invalid} invalid lines"
        ),
    }))
    .into_response()
}

async fn reclassify_words(State(service): State<Arc<FakeService>>) -> Response {
    let mut words = service.words.lock().unwrap();
    if words.is_empty() {
        return Json(json!({ "status": "info", "message": "no words to reclassify", "updated": 0 }))
            .into_response();
    }

    let mut updated = 0;
    for w in words.iter_mut() {
        let difficulty = classify(&w.word);
        if w.difficulty != difficulty {
            w.difficulty = difficulty;
            updated += 1;
        }
    }
    Json(json!({
        "status": "success",
        "message": format!("reclassified, {updated} words updated"),
        "updated": updated,
    }))
    .into_response()
}

async fn format_words(State(service): State<Arc<FakeService>>) -> Response {
    let mut words = service.words.lock().unwrap();
    if words.is_empty() {
        return Json(json!({
            "status": "info",
            "message": "the word library is already empty",
            "deleted_count": 0,
        }))
        .into_response();
    }

    let deleted = words.len();
    words.clear();
    Json(json!({
        "status": "success",
        "message": format!("deleted {deleted} words"),
        "deleted_count": deleted,
    }))
    .into_response()
}
