//! # Application State
//!
//! Core reader state. Presentation state (scroll offsets, the note editor)
//! lives in the `tui` module.
//!
//! ```text
//! App
//! ├── nav: NavigationState        // position + write-through persistence
//! ├── resolver: LessonResolver    // content lookups (cloned into tasks)
//! ├── storage: Storage            // notes, theme (shared with nav)
//! ├── load: LoadState             // Idle → Loading → Rendered | Failed
//! ├── generation: u64             // tags the newest resolve request
//! ├── quarter: Option<QuarterScreen>
//! ├── theme / presenter / overlay // display toggles
//! └── status_message: String
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use log::info;

use crate::content::{ContentLayout, FetchError, HttpContentSource, UiStrings, build_http_client};
use crate::core::config::{ResolvedConfig, StartOverrides};
use crate::core::navigation::NavigationState;
use crate::core::position::{Position, is_valid_day};
use crate::core::resolver::{LessonResolver, QuarterIntro, ResolvedDay};
use crate::core::storage::{FileStore, ProgressStore, Storage, Theme};

/// User-facing text for any failed day load. Details go to the log.
pub const LOAD_FAILED_MESSAGE: &str = "Sorry, this lesson could not load. (See hobd.log for details.)";

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Rendered(Box<ResolvedDay>),
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuarterScreen {
    Loading(u32),
    Ready(QuarterIntro),
    Failed(u32),
}

/// Full-screen blank used while presenting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenOverlay {
    #[default]
    None,
    Blackout,
    Whiteout,
}

pub struct App {
    pub nav: NavigationState,
    pub resolver: LessonResolver,
    pub storage: Storage,
    pub load: LoadState,
    pub generation: u64,
    pub quarter: Option<QuarterScreen>,
    pub theme: Theme,
    pub presenter: bool,
    pub overlay: ScreenOverlay,
    pub status_message: String,
}

impl App {
    pub fn new(resolver: LessonResolver, storage: Storage, default_language: Option<&str>) -> Self {
        Self::with_start(resolver, storage, default_language, &StartOverrides::default())
    }

    pub fn with_start(
        resolver: LessonResolver,
        storage: Storage,
        default_language: Option<&str>,
        start: &StartOverrides,
    ) -> Self {
        let position = start_position(storage.load_progress(), default_language, start);
        info!("Starting at {}", position);
        Self {
            nav: NavigationState::new(position, Box::new(storage.clone())),
            resolver,
            theme: storage.theme(),
            storage,
            load: LoadState::Idle,
            generation: 0,
            quarter: None,
            presenter: false,
            overlay: ScreenOverlay::None,
            status_message: String::new(),
        }
    }

    /// Wires the HTTP content source and the file store from resolved config.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, reqwest::Error> {
        let source = Arc::new(HttpContentSource::new(build_http_client()?));
        let resolver = LessonResolver::new(
            source.clone(),
            source,
            ContentLayout::new(config.base_url.clone()),
        );
        let storage = match &config.store_path {
            Some(path) => Storage::new(FileStore::open(path)),
            None => Storage::in_memory(),
        };
        Ok(Self::with_start(
            resolver,
            storage,
            Some(&config.default_language),
            &config.start,
        ))
    }

    pub fn position(&self) -> &Position {
        self.nav.position()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn rendered(&self) -> Option<&ResolvedDay> {
        match &self.load {
            LoadState::Rendered(day) => Some(day),
            _ => None,
        }
    }

    /// Localization of the rendered day, or an empty map.
    pub fn ui(&self) -> UiStrings {
        self.rendered().map(|d| d.ui.clone()).unwrap_or_default()
    }
}

/// Stored progress (or the initial position) with CLI overrides applied.
/// Invalid override days are ignored.
pub fn start_position(
    stored: Option<Position>,
    default_language: Option<&str>,
    start: &StartOverrides,
) -> Position {
    let mut position = stored.unwrap_or_else(|| {
        let mut initial = Position::default();
        if let Some(lang) = default_language {
            initial.language = lang.to_string();
        }
        initial
    });
    if let Some(lang) = &start.language {
        position.language = lang.clone();
    }
    if let Some(lesson) = &start.lesson {
        position.lesson = lesson.clone();
        position.day = 1;
    }
    if let Some(day) = start.day.filter(|d| is_valid_day(*d)) {
        position.day = day;
    }
    position
}
