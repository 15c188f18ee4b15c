//! # LessonView Component
//!
//! Scrollable body for one resolved day. Each `DayKind` has its own layout:
//!
//! - **Sabbath**: Markdown blocks (intro, memory verse, fundamental belief,
//!   key thought, introduction) followed by reflective questions.
//! - **FridayReview**: the general review note and the day's media links.
//! - **Weekday**: question entries. Numbered entries show scripture, the
//!   reader's note and an optional author note; unnumbered entries are
//!   reflective prompts.
//!
//! The whole day is built as one `Text`, wrapped by a `Paragraph`, and placed
//! in a `ScrollView` sized to the wrapped height.

use ratatui::Frame;
use ratatui::layout::{Position as ScrollOffset, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::content::{DayKind, DayRecord, Entry, UiStrings};
use crate::core::position::Position;
use crate::core::resolver::ResolvedDay;
use crate::core::storage::{NoteSlot, Storage, note_key};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;
use crate::tui::palette::Palette;

/// Markdown fields of a Sabbath day, in display order.
const SABBATH_FIELDS: [&str; 4] = ["sabbathIntro", "memoryVerse", "keyThought", "introduction"];

/// Scroll state for the lesson body. Lives in `TuiState` across frames.
#[derive(Default)]
pub struct LessonViewState {
    pub scroll_state: ScrollViewState,
    /// Viewport and wrapped content heights from the last render.
    pub viewport_height: u16,
    pub content_height: u16,
}

impl LessonViewState {
    pub fn reset(&mut self) {
        self.scroll_state.scroll_to_top();
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn clamp(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(ScrollOffset { x: 0, y: max_y });
        }
    }
}

impl EventHandler for LessonViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Up | TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::Down | TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::PageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::PageDown => self.scroll_state.scroll_page_down(),
            TuiEvent::Home => self.scroll_state.scroll_to_top(),
            TuiEvent::End => {
                let max_y = self.max_offset();
                self.scroll_state.set_offset(ScrollOffset { x: 0, y: max_y });
            }
            _ => return None,
        }
        self.clamp();
        Some(())
    }
}

pub struct LessonView<'a> {
    pub state: &'a mut LessonViewState,
    pub day: &'a ResolvedDay,
    pub storage: &'a Storage,
    pub palette: Palette,
}

impl<'a> LessonView<'a> {
    pub fn new(
        state: &'a mut LessonViewState,
        day: &'a ResolvedDay,
        storage: &'a Storage,
        palette: Palette,
    ) -> Self {
        Self {
            state,
            day,
            storage,
            palette,
        }
    }
}

impl<'a> Component for LessonView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // scrollbar column
        let text = day_text(self.day, self.storage, &self.palette);
        let paragraph = Paragraph::new(text)
            .style(self.palette.base())
            .wrap(Wrap { trim: false });
        let height = u16::try_from(paragraph.line_count(content_width)).unwrap_or(u16::MAX);

        self.state.viewport_height = area.height;
        self.state.content_height = height;
        self.state.clamp();

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Notes that can be edited on this day.
pub fn note_slots(day: &ResolvedDay) -> Vec<NoteSlot> {
    match day.kind {
        DayKind::Sabbath => Vec::new(),
        DayKind::FridayReview => vec![NoteSlot::Review],
        DayKind::Weekday => day
            .record
            .entries()
            .iter()
            .filter_map(|e| e.question_number())
            .map(NoteSlot::Question)
            .collect(),
    }
}

/// Full body text for a resolved day.
pub fn day_text(day: &ResolvedDay, storage: &Storage, palette: &Palette) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    if let Some(title) = &day.record.title {
        lines.push(Line::from(Span::styled(
            title.clone(),
            palette.heading().add_modifier(Modifier::UNDERLINED),
        )));
        lines.push(Line::default());
    }

    match day.kind {
        DayKind::Sabbath => sabbath_lines(&day.record, palette, &mut lines),
        DayKind::FridayReview => {
            review_lines(&day.record, &day.ui, &day.position, storage, palette, &mut lines)
        }
        DayKind::Weekday => {
            weekday_lines(&day.record, &day.ui, &day.position, storage, palette, &mut lines)
        }
    }
    Text::from(lines)
}

fn sabbath_lines(record: &DayRecord, palette: &Palette, lines: &mut Vec<Line<'static>>) {
    let blocks = SABBATH_FIELDS
        .iter()
        .take(2)
        .filter_map(|f| record.text_field(f))
        .chain(record.fundamental_belief())
        .chain(SABBATH_FIELDS.iter().skip(2).filter_map(|f| record.text_field(f)));

    for block in blocks {
        lines.extend(markdown::render(block, palette.fg, palette.accent).lines);
        lines.push(Line::default());
    }

    for q in record.sabbath_questions() {
        lines.push(Line::from(Span::styled(q.question, palette.heading())));
        lines.push(Line::default());
    }
}

fn review_lines(
    record: &DayRecord,
    ui: &UiStrings,
    position: &Position,
    storage: &Storage,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    lines.push(day_heading(record, ui, palette));
    lines.push(Line::default());

    lines.push(Line::from(vec![
        Span::styled(ui.localize("generalReview", "General Review"), palette.heading()),
        Span::styled("  [e] edit", palette.dim()),
    ]));
    let note = storage.note(&note_key(position, NoteSlot::Review));
    note_lines(&note, &ui.localize("reviewPrompt", "Write your review..."), palette, lines);
    lines.push(Line::default());

    let media = record.media();
    lines.push(Line::from(Span::styled(
        ui.localize("watchListen", "Watch/Listen"),
        palette.heading(),
    )));
    for (label, url) in [("Audio", media.audio), ("Video", media.video)] {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            lines.push(Line::from(vec![
                Span::styled(format!("{label}: "), palette.dim()),
                Span::styled(url, Style::default().fg(palette.accent).add_modifier(Modifier::UNDERLINED)),
            ]));
        }
    }
}

fn weekday_lines(
    record: &DayRecord,
    ui: &UiStrings,
    position: &Position,
    storage: &Storage,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    lines.push(day_heading(record, ui, palette));
    lines.push(Line::default());

    let placeholder = ui.localize("writeThoughts", "Write your thoughts...");
    for entry in record.entries() {
        entry_lines(&entry, position, storage, &placeholder, palette, lines);
        lines.push(Line::default());
    }
}

fn entry_lines(
    entry: &Entry,
    position: &Position,
    storage: &Storage,
    placeholder: &str,
    palette: &Palette,
    lines: &mut Vec<Line<'static>>,
) {
    let bold = Style::default().fg(palette.fg).add_modifier(Modifier::BOLD);
    let Some(number) = entry.question_number() else {
        // Reflective prompt: no scripture, no note
        lines.push(Line::from(Span::styled(entry.question.clone(), bold)));
        return;
    };

    lines.push(Line::from(vec![
        Span::styled(format!("{}. {}", number, entry.question), bold),
        Span::styled(format!("  [{number}] edit"), palette.dim()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            "Scripture: ",
            Style::default().fg(palette.fg).add_modifier(Modifier::ITALIC),
        ),
        Span::styled(entry.scripture.join(", "), Style::default().fg(palette.fg)),
    ]));

    let note = storage.note(&note_key(position, NoteSlot::Question(number)));
    note_lines(&note, placeholder, palette, lines);

    if let Some(author_note) = entry.author_note.as_deref().filter(|n| !n.is_empty()) {
        lines.push(Line::from(vec![
            Span::styled("Note: ", bold),
            Span::styled(author_note.to_string(), Style::default().fg(palette.fg)),
        ]));
    }
}

/// The reader's note, or the dimmed placeholder when there is none.
fn note_lines(note: &str, placeholder: &str, palette: &Palette, lines: &mut Vec<Line<'static>>) {
    let gutter = Span::styled("│ ", Style::default().fg(palette.accent));
    if note.is_empty() {
        lines.push(Line::from(vec![
            gutter,
            Span::styled(placeholder.to_string(), palette.dim().add_modifier(Modifier::ITALIC)),
        ]));
        return;
    }
    for line in note.lines() {
        lines.push(Line::from(vec![
            gutter.clone(),
            Span::styled(line.to_string(), Style::default().fg(palette.fg)),
        ]));
    }
}

fn day_heading(record: &DayRecord, ui: &UiStrings, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(ui.localize_day(&record.day), palette.heading()))
}
