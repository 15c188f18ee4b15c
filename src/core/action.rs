//! # Actions
//!
//! Everything that can happen in the reader becomes an `Action`.
//! User presses →? That's `Action::NextDay`.
//! A day finishes loading? That's `Action::DayLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any async work the adapter
//! must start. No network I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::content::FetchError;
use crate::core::navigation::QuarterRedirect;
use crate::core::position::Position;
use crate::core::resolver::{NavigationOutcome, QuarterIntro, ResolvedDay};
use crate::core::state::{App, LOAD_FAILED_MESSAGE, LoadState, QuarterScreen, ScreenOverlay};

pub const LOADING_MESSAGE: &str = "Loading... Please wait...";
pub const FIRST_DAY_MESSAGE: &str = "You're already at the beginning of the lesson.";
pub const END_OF_CONTENT_MESSAGE: &str = "End of available lessons. New lessons coming soon.";
pub const STILL_LOADING_MESSAGE: &str = "Still loading... try again in a moment.";
pub const RETRY_MESSAGE: &str = "This lesson did not load. Press r to retry.";

#[derive(Debug)]
pub enum Action {
    /// (Re)load the current position.
    Load,
    NextDay,
    PrevDay,
    /// Presenter-style forward: next day, or past the end of the lesson.
    Advance,
    /// Presenter-style back, with a notice on the first day.
    GoBack,
    DayLoaded {
        generation: u64,
        result: Result<ResolvedDay, FetchError>,
    },
    QuarterLoaded {
        quarter: u32,
        result: Result<QuarterIntro, FetchError>,
    },
    CloseQuarter,
    SaveNote {
        key: String,
        text: String,
    },
    ToggleTheme,
    TogglePresenter,
    ToggleBlackout,
    ToggleWhiteout,
    ClearScreenOverlay,
    Quit,
}

/// Work the adapter must do after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Resolve `position` and report back with `Action::DayLoaded`.
    SpawnResolve { generation: u64, position: Position },
    /// Fetch the quarter intro and report back with `Action::QuarterLoaded`.
    OpenQuarter { language: String, quarter: u32 },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Load => begin_load(app),
        Action::NextDay => step(app, 1),
        Action::PrevDay => step(app, -1),
        Action::Advance => {
            if !app.position().is_last_day() {
                return step(app, 1);
            }
            advance_past_lesson(app)
        }
        Action::GoBack => {
            if app.nav.step_day(-1) {
                begin_load(app)
            } else {
                app.status_message = FIRST_DAY_MESSAGE.to_string();
                Effect::None
            }
        }
        Action::DayLoaded { generation, result } => {
            if generation != app.generation {
                debug!(
                    "Dropping stale load (generation {} < {})",
                    generation, app.generation
                );
                return Effect::None;
            }
            match result {
                Ok(day) => {
                    app.nav.persist();
                    app.status_message.clear();
                    app.load = LoadState::Rendered(Box::new(day));
                }
                Err(e) => {
                    warn!("Lesson failed to load at {}: {}", app.position(), e);
                    app.status_message = LOAD_FAILED_MESSAGE.to_string();
                    app.load = LoadState::Failed(e);
                }
            }
            Effect::None
        }
        Action::QuarterLoaded { quarter, result } => {
            if app.quarter != Some(QuarterScreen::Loading(quarter)) {
                debug!("Dropping quarter {} intro: screen no longer open", quarter);
                return Effect::None;
            }
            app.quarter = Some(match result {
                Ok(intro) => QuarterScreen::Ready(intro),
                Err(e) => {
                    warn!("Quarter {} intro failed to load: {}", quarter, e);
                    QuarterScreen::Failed(quarter)
                }
            });
            Effect::None
        }
        Action::CloseQuarter => {
            app.quarter = None;
            Effect::None
        }
        Action::SaveNote { key, text } => {
            app.storage.save_note(&key, &text);
            app.status_message = "Note saved".to_string();
            Effect::None
        }
        Action::ToggleTheme => {
            app.theme = app.theme.toggled();
            app.storage.save_theme(app.theme);
            app.status_message = format!("Theme: {}", app.theme);
            Effect::None
        }
        Action::TogglePresenter => {
            app.presenter = !app.presenter;
            if !app.presenter {
                app.overlay = ScreenOverlay::None;
            }
            Effect::None
        }
        Action::ToggleBlackout => {
            app.overlay = toggle_overlay(app.overlay, ScreenOverlay::Blackout);
            Effect::None
        }
        Action::ToggleWhiteout => {
            app.overlay = toggle_overlay(app.overlay, ScreenOverlay::Whiteout);
            Effect::None
        }
        Action::ClearScreenOverlay => {
            app.overlay = ScreenOverlay::None;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn toggle_overlay(current: ScreenOverlay, wanted: ScreenOverlay) -> ScreenOverlay {
    if current == wanted {
        ScreenOverlay::None
    } else {
        wanted
    }
}

fn step(app: &mut App, delta: i8) -> Effect {
    if app.nav.step_day(delta) {
        begin_load(app)
    } else {
        Effect::None
    }
}

/// Starts a fresh resolve. Earlier requests still in flight become stale.
fn begin_load(app: &mut App) -> Effect {
    app.generation += 1;
    app.load = LoadState::Loading;
    app.quarter = None;
    app.status_message = LOADING_MESSAGE.to_string();
    Effect::SpawnResolve {
        generation: app.generation,
        position: app.position().clone(),
    }
}

/// Applies the forward affordance resolved for the last day of the lesson.
fn advance_past_lesson(app: &mut App) -> Effect {
    let Some(forward) = app.rendered().and_then(|d| d.forward.clone()) else {
        debug!("Advance ignored: no resolved forward affordance yet");
        app.status_message = match app.load {
            LoadState::Failed(_) => RETRY_MESSAGE,
            _ => STILL_LOADING_MESSAGE,
        }
        .to_string();
        return Effect::None;
    };
    match forward {
        NavigationOutcome::AdvancedToNextLesson(lesson) => {
            info!("Advancing to {}", lesson);
            app.nav.jump_to_lesson_start(lesson);
            begin_load(app)
        }
        NavigationOutcome::AdvancedToNextQuarter(quarter) => {
            let QuarterRedirect(quarter) = app.nav.jump_to_quarter(quarter);
            app.quarter = Some(QuarterScreen::Loading(quarter));
            Effect::OpenQuarter {
                language: app.position().language.clone(),
                quarter,
            }
        }
        NavigationOutcome::EndOfContent => {
            app.status_message = END_OF_CONTENT_MESSAGE.to_string();
            Effect::None
        }
    }
}
