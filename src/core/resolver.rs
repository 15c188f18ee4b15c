//! # Lesson Resolver
//!
//! Turns a [`Position`] into a renderable day:
//!
//! ```text
//! position ──► ui/{lang}.json ─────────────────┐ (best effort, concurrent)
//!          └─► content/{lang}/{lesson}/day-D ──┴─► classify ──► day 7? ──► probe next lesson
//!                                                                           └─► probe next quarter
//! ```
//!
//! Nothing is cached: authors correct content in place, so every navigation
//! fetches again. Only the day fetch can fail a resolve; the UI strings and
//! the probes are optional and degrade silently.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use crate::content::{ContentFetcher, ContentLayout, DayKind, DayRecord, FetchError, ResourceProbe, UiStrings};
use crate::core::position::{LessonId, Position, quarter_for};

/// What "forward" means once the last day of a lesson is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    AdvancedToNextLesson(LessonId),
    AdvancedToNextQuarter(u32),
    EndOfContent,
}

/// A fetched and classified day, ready for the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub position: Position,
    pub record: DayRecord,
    pub kind: DayKind,
    pub ui: UiStrings,
    /// Only computed on the last day of a lesson.
    pub forward: Option<NavigationOutcome>,
}

/// Intro page of a quarter (`intro-qN/index.json`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuarterIntro {
    pub quarter: u32,
    pub title: Option<String>,
    pub introduction: Option<String>,
}

impl QuarterIntro {
    fn from_value(quarter: u32, value: &Value) -> Self {
        let text = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        Self {
            quarter,
            title: text("title"),
            introduction: text("introduction").or_else(|| text("description")),
        }
    }
}

/// Runs an optional lookup, logging and discarding any failure.
///
/// Marks the places where an error is deliberately not propagated.
pub async fn best_effort<T, E, F>(what: &str, lookup: F) -> Option<T>
where
    E: Display,
    F: Future<Output = Result<T, E>>,
{
    match lookup.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} unavailable, continuing without: {}", what, e);
            None
        }
    }
}

#[derive(Clone)]
pub struct LessonResolver {
    fetcher: Arc<dyn ContentFetcher>,
    probe: Arc<dyn ResourceProbe>,
    layout: ContentLayout,
}

impl LessonResolver {
    pub fn new(
        fetcher: Arc<dyn ContentFetcher>,
        probe: Arc<dyn ResourceProbe>,
        layout: ContentLayout,
    ) -> Self {
        Self {
            fetcher,
            probe,
            layout,
        }
    }

    pub fn layout(&self) -> &ContentLayout {
        &self.layout
    }

    pub async fn resolve(&self, position: &Position) -> Result<ResolvedDay, FetchError> {
        info!("Resolving {}", position);
        let day_url = self
            .layout
            .day_url(&position.language, &position.lesson, position.day);

        let (ui, fetched) = futures::join!(
            self.load_ui_strings(&position.language),
            self.fetcher.fetch_json(&day_url)
        );
        let value = fetched.inspect_err(|e| warn!("Failed to load {}: {}", day_url, e))?;

        let record = DayRecord::from_value(value);
        let kind = record.kind();
        debug!("{} is '{}' ({:?})", position, record.day, kind);

        let forward = if position.is_last_day() {
            Some(self.forward_affordance(position).await)
        } else {
            None
        };

        Ok(ResolvedDay {
            position: position.clone(),
            record,
            kind,
            ui,
            forward,
        })
    }

    /// Localization for `language`; empty when it cannot be loaded.
    pub async fn load_ui_strings(&self, language: &str) -> UiStrings {
        let url = self.layout.ui_url(language);
        best_effort("UI strings", self.fetcher.fetch_json(&url))
            .await
            .map(UiStrings::from_value)
            .unwrap_or_default()
    }

    /// Decides where "forward" leads from the end of `position`'s lesson.
    ///
    /// Candidates are probed in order and the first hit wins, so the quarter
    /// probe is never issued once the next lesson is found. Content can grow
    /// without the reader knowing how many lessons or quarters exist.
    pub async fn forward_affordance(&self, position: &Position) -> NavigationOutcome {
        let language = &position.language;
        let Some(next_lesson) = position.lesson.next() else {
            warn!("No lesson follows {}", position.lesson);
            return NavigationOutcome::EndOfContent;
        };
        let quarter = quarter_for(next_lesson.number());

        let candidates = [
            (
                self.layout.lesson_start_url(language, &next_lesson),
                NavigationOutcome::AdvancedToNextLesson(next_lesson),
            ),
            (
                self.layout.quarter_index_url(language, quarter),
                NavigationOutcome::AdvancedToNextQuarter(quarter),
            ),
        ];

        for (url, outcome) in candidates {
            if self.probe.exists(&url).await {
                info!("Forward from {}: {:?}", position, outcome);
                return outcome;
            }
        }
        info!("Forward from {}: end of content", position);
        NavigationOutcome::EndOfContent
    }

    pub async fn quarter_intro(&self, language: &str, quarter: u32) -> Result<QuarterIntro, FetchError> {
        let url = self.layout.quarter_index_url(language, quarter);
        let value = self.fetcher.fetch_json(&url).await?;
        Ok(QuarterIntro::from_value(quarter, &value))
    }
}
