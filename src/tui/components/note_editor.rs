//! # NoteEditor Component
//!
//! Multi-line editor for one question or review note.
//!
//! The editor owns a copy of the note. Nothing is written until Enter, which
//! emits `EditorEvent::Save` with the note's storage key; Esc discards the
//! edit. Ctrl+J inserts a newline.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::palette::Palette;

/// Borders (2) plus one column of padding each side.
const HORIZONTAL_OVERHEAD: u16 = 4;
const VERTICAL_OVERHEAD: u16 = 2;
const MAX_VISIBLE_LINES: u16 = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Save { key: String, text: String },
    Cancel,
    Changed,
}

pub struct NoteEditor {
    /// Storage key the note is saved under.
    pub key: String,
    /// Shown in the border, e.g. "Question 2".
    pub label: String,
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    scroll_offset: u16,
    pub palette: Palette,
}

impl NoteEditor {
    pub fn new(key: String, label: String, text: String, palette: Palette) -> Self {
        let cursor = text.len();
        Self {
            key,
            label,
            buffer: text,
            cursor,
            scroll_offset: 0,
            palette,
        }
    }

    /// Height needed for the current text in an area `width` columns wide.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let lines = wrapped_lines(&self.buffer, inner_width(width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Row and column of the cursor within the wrapped text.
    fn cursor_row_col(&self, width: u16) -> (u16, u16) {
        let before = &self.buffer[..self.cursor];
        let row = wrapped_lines(before, width).len().saturating_sub(1) as u16;

        // Wrapping drops trailing spaces, so measure the logical line instead
        let current = &before[self.line_start()..];
        let segments = wrapped_lines(current, width);
        let earlier: usize = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| s.width())
            .sum();
        (row, current.width().saturating_sub(earlier) as u16)
    }

    fn keep_cursor_visible(&mut self, width: u16) {
        let (row, _) = self.cursor_row_col(width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    fn insert(&mut self, text: &str) -> Option<EditorEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(EditorEvent::Changed)
    }

    fn line_start(&self) -> usize {
        self.buffer[..self.cursor].rfind('\n').map(|i| i + 1).unwrap_or(0)
    }

    fn line_end(&self) -> usize {
        self.buffer[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.buffer.len())
    }
}

fn inner_width(width: u16) -> u16 {
    width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Splits on newlines, then hard-wraps each line at `width` columns.
/// Empty lines are kept so rows line up with the buffer's newlines.
fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let options = textwrap::Options::new(width)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    text.split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, &options)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect()
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

impl Component for NoteEditor {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.keep_cursor_visible(width);

        let visible: Vec<String> = wrapped_lines(&self.buffer, width)
            .into_iter()
            .skip(self.scroll_offset as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .collect();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.palette.accent))
            .title(format!(" {} ", self.label))
            .title_bottom(" Enter save · Ctrl+J newline · Esc cancel ")
            .padding(Padding::horizontal(1));
        frame.render_widget(
            Paragraph::new(visible.join("\n"))
                .block(block)
                .style(self.palette.base()),
            area,
        );

        let (row, col) = self.cursor_row_col(width);
        let x = area.x + 2 + col.min(width.saturating_sub(1));
        let y = area.y + 1 + row.saturating_sub(self.scroll_offset);
        frame.set_cursor_position((x, y));
    }
}

impl EventHandler for NoteEditor {
    type Event = EditorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Char(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(&text.replace("\r\n", "\n")),
            TuiEvent::Newline => self.insert("\n"),
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(EditorEvent::Changed)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(EditorEvent::Changed)
            }
            TuiEvent::Left => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Right => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Home => {
                self.cursor = self.line_start();
                None
            }
            TuiEvent::End => {
                self.cursor = self.line_end();
                None
            }
            TuiEvent::Enter => Some(EditorEvent::Save {
                key: self.key.clone(),
                text: self.buffer.clone(),
            }),
            TuiEvent::Escape => Some(EditorEvent::Cancel),
            _ => None,
        }
    }
}
