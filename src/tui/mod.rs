//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the reader,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event loop
//!
//! Each pass draws (only when something changed), waits for input, drains
//! every pending input event, then applies the actions that background
//! tasks sent back over the channel. Network work runs in `tokio::spawn`ed
//! tasks; the loop itself never awaits.
//!
//! ## Keys
//!
//! | Key                 | Reader                   | Note editor     |
//! |---------------------|--------------------------|-----------------|
//! | `→` `l` / `←` `h`   | next / previous day      | move cursor     |
//! | `Enter` `n` `Space` | advance (presenter style)| save            |
//! | `Bksp` `p`          | go back (presenter style)| delete          |
//! | `↑↓` `PgUp/PgDn`    | scroll                   |                 |
//! | digits / `e`        | edit question / review   | type            |
//! | `t` `f` `b` `w` `r` | theme, presenter, black, white, reload | |
//! | `Esc`               | clear screen, close quarter, leave presenter | cancel |
//! | `q` / `Ctrl+C`      | quit                     | `Ctrl+C` quits  |
//!
//! Question numbers are typed digit by digit. The editor opens as soon as
//! the digits name exactly one question (`3` when there is no `30`-something),
//! otherwise on `Enter`. `Esc` or `Bksp` drops the typed number.

mod component;
mod components;
mod event;
pub mod markdown;
mod palette;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::position::Position;
use crate::core::resolver::LessonResolver;
use crate::core::state::{App, ScreenOverlay};
use crate::core::storage::{NoteSlot, note_key};
use crate::tui::component::EventHandler;
use crate::tui::components::{EditorEvent, LessonViewState, NoteEditor, note_slots};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::palette::Palette;

const LOADING_POLL: Duration = Duration::from_millis(100);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core reader logic)
pub struct TuiState {
    pub lesson_view: LessonViewState,
    /// Open note editor, if any. Takes all input while open.
    pub editor: Option<NoteEditor>,
    /// Generation of the day last drawn; a change resets the scroll.
    pub shown_generation: u64,
    /// Digits of a question number being typed.
    pub question_input: String,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            lesson_view: LessonViewState::default(),
            editor: None,
            shown_generation: 0,
            question_input: String::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard =
        TerminalModeGuard::new().inspect_err(|e| warn!("Terminal modes unavailable: {}", e));

    let result = event_loop(&mut terminal, &mut app, &mut tui);

    ratatui::restore();
    info!("Reader closed at {}", app.position());
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    tui: &mut TuiState,
) -> std::io::Result<()> {
    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut should_quit = dispatch(app, Action::Load, &tx);
    let mut needs_redraw = true;

    while !should_quit {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, tui))?;
            needs_redraw = false;
        }

        let timeout = if app.is_loading() { LOADING_POLL } else { IDLE_POLL };

        // First event (waiting up to `timeout`), then drain everything pending
        let mut next = poll_event_timeout(timeout)?;
        while let Some(event) = next {
            needs_redraw = true;
            if handle_event(app, tui, event, &tx) {
                should_quit = true;
                break;
            }
            next = poll_event_immediate()?;
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(app, action, &tx) {
                should_quit = true;
            }
        }
    }
    Ok(())
}

/// Applies `action` and starts whatever work it asks for.
/// Returns true when the reader should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::SpawnResolve {
            generation,
            position,
        } => {
            spawn_resolve(app.resolver.clone(), generation, position, tx.clone());
            false
        }
        Effect::OpenQuarter { language, quarter } => {
            spawn_quarter(app.resolver.clone(), language, quarter, tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

/// Routes one input event. Returns true when the reader should quit.
fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent, tx: &mpsc::Sender<Action>) -> bool {
    if matches!(event, TuiEvent::ForceQuit) {
        return dispatch(app, Action::Quit, tx);
    }
    if matches!(event, TuiEvent::Resize) {
        return false;
    }

    // The editor takes everything else while open
    if let Some(editor) = tui.editor.as_mut() {
        match editor.handle_event(&event) {
            Some(EditorEvent::Save { key, text }) => {
                tui.editor = None;
                return dispatch(app, Action::SaveNote { key, text }, tx);
            }
            Some(EditorEvent::Cancel) => tui.editor = None,
            Some(EditorEvent::Changed) | None => {}
        }
        return false;
    }

    if tui.lesson_view.handle_event(&event).is_some() {
        return false;
    }

    if let TuiEvent::Char(digit @ '0'..='9') = event {
        tui.question_input.push(digit);
        select_question(app, tui);
        return false;
    }
    if !tui.question_input.is_empty() {
        let typed = std::mem::take(&mut tui.question_input);
        match event {
            TuiEvent::Enter => {
                if let Ok(n) = typed.parse() {
                    open_editor(app, tui, NoteSlot::Question(n));
                }
                return false;
            }
            TuiEvent::Escape | TuiEvent::Backspace => return false,
            _ => {}
        }
    }

    if matches!(event, TuiEvent::Char('e')) {
        open_editor(app, tui, NoteSlot::Review);
        return false;
    }

    match reader_action(&event, app) {
        Some(action) => dispatch(app, action, tx),
        None => false,
    }
}

/// Maps a reader key to an action. Esc depends on what is showing.
fn reader_action(event: &TuiEvent, app: &App) -> Option<Action> {
    let action = match event {
        TuiEvent::Char('q') => Action::Quit,
        TuiEvent::Right | TuiEvent::Char('l') => Action::NextDay,
        TuiEvent::Left | TuiEvent::Char('h') => Action::PrevDay,
        TuiEvent::Enter | TuiEvent::Char('n') | TuiEvent::Char(' ') => Action::Advance,
        TuiEvent::Backspace | TuiEvent::Char('p') => Action::GoBack,
        TuiEvent::Char('r') => Action::Load,
        TuiEvent::Char('t') => Action::ToggleTheme,
        TuiEvent::Char('f') => Action::TogglePresenter,
        TuiEvent::Char('b') => Action::ToggleBlackout,
        TuiEvent::Char('w') => Action::ToggleWhiteout,
        TuiEvent::Escape if app.overlay != ScreenOverlay::None => Action::ClearScreenOverlay,
        TuiEvent::Escape if app.quarter.is_some() => Action::CloseQuarter,
        TuiEvent::Escape if app.presenter => Action::TogglePresenter,
        _ => return None,
    };
    Some(action)
}

/// Question numbers that can be edited on the rendered day.
fn question_numbers(app: &App) -> Vec<u32> {
    app.rendered()
        .map(note_slots)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|slot| match slot {
            NoteSlot::Question(n) => Some(n),
            NoteSlot::Review => None,
        })
        .collect()
}

/// Opens the typed question once no other question number starts with the
/// same digits. Drops the input when nothing can match.
fn select_question(app: &App, tui: &mut TuiState) {
    let numbers = question_numbers(app);
    let typed = tui.question_input.as_str();
    let candidates: Vec<u32> = numbers
        .into_iter()
        .filter(|n| n.to_string().starts_with(typed))
        .collect();

    match candidates.as_slice() {
        [] => {
            debug!("No question matches {}", typed);
            tui.question_input.clear();
        }
        [only] if only.to_string() == typed => {
            let slot = NoteSlot::Question(*only);
            tui.question_input.clear();
            open_editor(app, tui, slot);
        }
        _ => {}
    }
}

/// Opens the editor for `slot` if the rendered day has that note.
fn open_editor(app: &App, tui: &mut TuiState, slot: NoteSlot) {
    let Some(day) = app.rendered() else {
        return;
    };
    if app.quarter.is_some() || !note_slots(day).contains(&slot) {
        debug!("No {:?} note on {}", slot, day.position);
        return;
    }

    let key = note_key(&day.position, slot);
    let label = match slot {
        NoteSlot::Question(n) => format!("Question {n}"),
        NoteSlot::Review => day.ui.localize("generalReview", "General Review"),
    };
    let text = app.storage.note(&key);
    info!("Editing note {}", key);
    tui.editor = Some(NoteEditor::new(key, label, text, Palette::for_theme(app.theme)));
}

fn spawn_resolve(resolver: LessonResolver, generation: u64, position: Position, tx: mpsc::Sender<Action>) {
    info!("Spawning resolve for {} (generation {})", position, generation);
    tokio::spawn(async move {
        let result = resolver.resolve(&position).await;
        if tx.send(Action::DayLoaded { generation, result }).is_err() {
            warn!("Failed to send DayLoaded for {}: receiver dropped", position);
        }
    });
}

fn spawn_quarter(resolver: LessonResolver, language: String, quarter: u32, tx: mpsc::Sender<Action>) {
    info!("Spawning quarter {} intro ({})", quarter, language);
    tokio::spawn(async move {
        let result = resolver.quarter_intro(&language, quarter).await;
        if tx.send(Action::QuarterLoaded { quarter, result }).is_err() {
            warn!("Failed to send QuarterLoaded for quarter {}: receiver dropped", quarter);
        }
    });
}
