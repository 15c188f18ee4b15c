//! # QuarterView Component
//!
//! Shown after finishing the last lesson of a quarter. Displays the next
//! quarter's title and introduction when its `index.json` provides them.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::content::UiStrings;
use crate::core::state::QuarterScreen;
use crate::tui::component::Component;
use crate::tui::markdown;
use crate::tui::palette::Palette;

pub struct QuarterView<'a> {
    pub screen: &'a QuarterScreen,
    pub ui: &'a UiStrings,
    pub palette: Palette,
}

impl<'a> QuarterView<'a> {
    pub fn text(&self) -> Text<'static> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        match self.screen {
            QuarterScreen::Loading(_) => {
                lines.push(Line::from(Span::styled(
                    crate::core::action::LOADING_MESSAGE,
                    self.palette.dim(),
                )));
            }
            QuarterScreen::Failed(quarter) => {
                lines.push(Line::from(Span::styled(
                    format!("Quarter {quarter} is available, but its introduction could not load."),
                    self.palette.dim(),
                )));
            }
            QuarterScreen::Ready(intro) => {
                if let Some(title) = &intro.title {
                    lines.push(Line::from(Span::styled(title.clone(), self.palette.heading())));
                    lines.push(Line::default());
                }
                match &intro.introduction {
                    Some(body) => {
                        lines.extend(markdown::render(body, self.palette.fg, self.palette.accent).lines)
                    }
                    None if intro.title.is_none() => lines.push(Line::from(Span::styled(
                        format!("Quarter {} is available.", intro.quarter),
                        self.palette.dim(),
                    ))),
                    None => {}
                }
            }
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Esc back", self.palette.dim())));
        Text::from(lines)
    }

    fn quarter(&self) -> u32 {
        match self.screen {
            QuarterScreen::Loading(q) | QuarterScreen::Failed(q) => *q,
            QuarterScreen::Ready(intro) => intro.quarter,
        }
    }
}

impl<'a> Component for QuarterView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(
            " {} {} ",
            self.ui.localize("nextQuarter", "Next Quarter"),
            self.quarter()
        );
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.palette.heading())
            .title(title)
            .padding(Padding::uniform(1));
        frame.render_widget(
            Paragraph::new(self.text())
                .block(block)
                .style(self.palette.base())
                .wrap(Wrap { trim: false }),
            area,
        );
    }
}
