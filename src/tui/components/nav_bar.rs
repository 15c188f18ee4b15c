//! # NavBar Component
//!
//! Bottom line: day navigation and key hints.
//!
//! Prev is hidden on day 1 and Next on day 7. On day 7 the forward button
//! reflects where the lesson leads: the next lesson, the next quarter, or
//! nothing at all.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::content::UiStrings;
use crate::core::position::{FIRST_DAY, LAST_DAY};
use crate::core::resolver::NavigationOutcome;
use crate::tui::component::Component;
use crate::tui::palette::Palette;

const READER_HINTS: &str = "q quit · t theme · f present · r reload";
const PRESENTER_HINTS: &str = "Enter next · Bksp back · b black · w white · Esc exit";

pub struct NavBar<'a> {
    pub day: u8,
    pub forward: Option<&'a NavigationOutcome>,
    pub ui: &'a UiStrings,
    pub presenter: bool,
    pub palette: Palette,
}

impl<'a> NavBar<'a> {
    /// Button labels in display order, e.g. `["◀ Prev", "Next ▶"]`.
    pub fn buttons(&self) -> Vec<String> {
        let mut buttons = Vec::new();
        if self.day > FIRST_DAY {
            buttons.push(format!("◀ {}", self.ui.localize("prev", "Prev")));
        }
        if self.day < LAST_DAY {
            buttons.push(format!("{} ▶", self.ui.localize("next", "Next")));
        } else {
            match self.forward {
                Some(NavigationOutcome::AdvancedToNextLesson(_)) => {
                    buttons.push(format!("{} ▶", self.ui.localize("nextLesson", "Next Lesson")))
                }
                Some(NavigationOutcome::AdvancedToNextQuarter(_)) => {
                    buttons.push(format!("{} ▶", self.ui.localize("nextQuarter", "Next Quarter")))
                }
                Some(NavigationOutcome::EndOfContent) | None => {}
            }
        }
        buttons
    }

    fn day_dots(&self) -> Vec<Span<'static>> {
        (FIRST_DAY..=LAST_DAY)
            .map(|d| {
                if d == self.day {
                    Span::styled(
                        format!("[{d}]"),
                        Style::default().fg(self.palette.accent).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(format!(" {d} "), self.palette.dim())
                }
            })
            .collect()
    }
}

impl<'a> Component for NavBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let button_style = Style::default().fg(self.palette.fg).add_modifier(Modifier::BOLD);
        let mut spans: Vec<Span<'static>> = Vec::new();
        for label in self.buttons() {
            spans.push(Span::styled(label, button_style));
            spans.push(Span::raw("  "));
        }
        spans.extend(self.day_dots());
        spans.push(Span::raw("   "));
        let hints = if self.presenter { PRESENTER_HINTS } else { READER_HINTS };
        spans.push(Span::styled(hints, self.palette.dim()));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(self.palette.base()),
            area,
        );
    }
}
