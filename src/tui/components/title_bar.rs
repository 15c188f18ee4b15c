//! # TitleBar Component
//!
//! Top line of the reader: where you are, and what just happened.
//!
//! ```text
//! en · Lesson 3 · Tuesday | Faith That Works          Note saved
//! ```
//!
//! The status message is right-aligned and wins over the lesson title when the
//! terminal is narrow; the title is truncated by display width.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::palette::Palette;

pub struct TitleBar {
    /// e.g. `en · Lesson 3 · Tuesday`
    pub location: String,
    pub title: Option<String>,
    pub status_message: String,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(location: String, title: Option<String>, status_message: String, palette: Palette) -> Self {
        Self {
            location,
            title,
            status_message,
            palette,
        }
    }

    /// Left-hand text, cut to fit in `width` display columns.
    fn left_text(&self, width: usize) -> String {
        let full = match &self.title {
            Some(title) => format!("{} | {}", self.location, title),
            None => self.location.clone(),
        };
        truncate_to_width(&full, width)
    }
}

/// Cuts `text` to at most `width` display columns, marking the cut with `…`.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let total = area.width as usize;
        let status = truncate_to_width(&self.status_message, total);
        let status_width = status.width();
        let gap = if status_width > 0 { 2 } else { 0 };
        let left = self.left_text(total.saturating_sub(status_width + gap));
        let padding = total.saturating_sub(left.width() + status_width);

        let line = Line::from(vec![
            Span::styled(left, self.palette.heading()),
            Span::raw(" ".repeat(padding)),
            Span::styled(status, Style::default().fg(self.palette.accent)),
        ]);
        frame.render_widget(Paragraph::new(line).style(self.palette.base()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(title_bar: &mut TitleBar, width: u16) -> String {
        let backend = TestBackend::new(width, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn title_bar(status: &str) -> TitleBar {
        TitleBar::new(
            "en · Lesson 3 · Tuesday".to_string(),
            Some("Faith That Works".to_string()),
            status.to_string(),
            Palette::for_theme(Theme::Dark),
        )
    }

    #[test]
    fn test_shows_location_title_and_status() {
        let text = draw(&mut title_bar("Note saved"), 80);
        assert!(text.contains("en · Lesson 3 · Tuesday | Faith That Works"));
        assert!(text.trim_end().ends_with("Note saved"));
    }

    #[test]
    fn test_status_wins_when_narrow() {
        let text = draw(&mut title_bar("Loading... Please wait..."), 40);
        assert!(text.contains("Loading... Please wait..."));
        assert!(text.contains('…'));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Sabbath", 10), "Sabbath");
        assert_eq!(truncate_to_width("Sabbath Afternoon", 8), "Sabbath…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }
}
