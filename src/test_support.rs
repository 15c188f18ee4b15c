//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::content::{ContentFetcher, ContentLayout, FetchError, ResourceProbe};
use crate::core::position::Position;
use crate::core::resolver::LessonResolver;
use crate::core::state::App;
use crate::core::storage::{ProgressStore, Storage};

pub const TEST_BASE: &str = "http://content.test";

/// Progress store that remembers every save.
#[derive(Clone, Default)]
pub struct RecordingProgressStore {
    saved: Arc<Mutex<Vec<Position>>>,
}

impl RecordingProgressStore {
    pub fn saved(&self) -> Vec<Position> {
        self.saved.lock().unwrap().clone()
    }
}

impl ProgressStore for RecordingProgressStore {
    fn load_progress(&self) -> Option<Position> {
        None
    }

    fn save_progress(&self, position: &Position) {
        self.saved.lock().unwrap().push(position.clone());
    }
}

/// In-memory content: documents by URL, a set of URLs that probe as present,
/// and URLs whose probing fails the test.
#[derive(Clone, Default)]
pub struct FakeContent {
    documents: Arc<HashMap<String, Result<Value, FetchError>>>,
    existing: Arc<HashSet<String>>,
    forbidden: Arc<HashSet<String>>,
    probe_log: Arc<Mutex<Vec<String>>>,
}

impl FakeContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: &str, value: Value) -> Self {
        Arc::make_mut(&mut self.documents).insert(url.to_string(), Ok(value));
        self
    }

    pub fn with_error(mut self, url: &str, error: FetchError) -> Self {
        Arc::make_mut(&mut self.documents).insert(url.to_string(), Err(error));
        self
    }

    pub fn with_existing(mut self, url: &str) -> Self {
        Arc::make_mut(&mut self.existing).insert(url.to_string());
        self
    }

    pub fn forbid_probe(mut self, url: &str) -> Self {
        Arc::make_mut(&mut self.forbidden).insert(url.to_string());
        self
    }

    pub fn probes(&self) -> Vec<String> {
        self.probe_log.lock().unwrap().clone()
    }

    pub fn resolver(&self) -> LessonResolver {
        LessonResolver::new(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            ContentLayout::new(TEST_BASE),
        )
    }
}

#[async_trait]
impl ContentFetcher for FakeContent {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        self.documents
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::HttpError(404)))
    }
}

#[async_trait]
impl ResourceProbe for FakeContent {
    async fn exists(&self, url: &str) -> bool {
        assert!(!self.forbidden.contains(url), "probe of {url} must not happen");
        self.probe_log.lock().unwrap().push(url.to_string());
        self.existing.contains(url)
    }
}

/// Creates a test App over empty content and in-memory storage.
pub fn test_app() -> App {
    App::new(FakeContent::new().resolver(), Storage::in_memory(), None)
}
