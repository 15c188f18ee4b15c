use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::content::UiStrings;
use crate::core::action::LOADING_MESSAGE;
use crate::core::state::{App, LOAD_FAILED_MESSAGE, LoadState, ScreenOverlay};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{LessonView, NavBar, QuarterView, TitleBar};
use crate::tui::palette::Palette;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let area = frame.area();

    // Blackout/whiteout hide everything
    let blank = match app.overlay {
        ScreenOverlay::Blackout => Some(Color::Black),
        ScreenOverlay::Whiteout => Some(Color::White),
        ScreenOverlay::None => None,
    };
    if let Some(color) = blank {
        frame.render_widget(Block::default().style(Style::default().bg(color)), area);
        return;
    }

    let palette = Palette::for_theme(app.theme);
    let ui = app.ui();
    frame.render_widget(Block::default().style(palette.base()), area);

    use Constraint::{Length, Min};
    let [title_area, body_area, nav_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(area);

    // Presenter mode keeps the status line but drops the location
    let (location, title) = if app.presenter {
        (String::new(), None)
    } else {
        (
            location_text(app, &ui),
            app.rendered().and_then(|d| d.record.title.clone()),
        )
    };
    let status = if tui.question_input.is_empty() {
        app.status_message.clone()
    } else {
        format!("Question {}_", tui.question_input)
    };
    TitleBar::new(location, title, status, palette).render(frame, title_area);

    let body_area = match tui.editor.as_mut() {
        Some(editor) => {
            let editor_height = editor.calculate_height(body_area.width).min(body_area.height);
            let [body, editor_area] =
                Layout::vertical([Min(0), Length(editor_height)]).areas(body_area);
            editor.render(frame, editor_area);
            body
        }
        None => body_area,
    };
    draw_body(frame, body_area, app, tui, &ui, palette);

    NavBar {
        day: app.position().day,
        forward: app.rendered().and_then(|d| d.forward.as_ref()),
        ui: &ui,
        presenter: app.presenter,
        palette,
    }
    .render(frame, nav_area);
}

fn draw_body(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState, ui: &UiStrings, palette: Palette) {
    if let Some(screen) = &app.quarter {
        QuarterView { screen, ui, palette }.render(frame, area);
        return;
    }

    match &app.load {
        LoadState::Idle | LoadState::Loading => draw_notice(frame, area, LOADING_MESSAGE, palette.fg),
        LoadState::Failed(_) => draw_error_view(frame, area, LOAD_FAILED_MESSAGE, palette),
        LoadState::Rendered(day) => {
            if tui.shown_generation != app.generation {
                tui.lesson_view.reset();
                tui.shown_generation = app.generation;
            }
            LessonView::new(&mut tui.lesson_view, day, &app.storage, palette).render(frame, area);
        }
    }
}

/// e.g. `en · Lesson 3 · Tuesday`
fn location_text(app: &App, ui: &UiStrings) -> String {
    let position = app.position();
    let day = match app.rendered() {
        Some(day) => ui.localize_day(&day.record.day),
        None => format!("{} {}", ui.localize("day", "Day"), position.day),
    };
    format!(
        "{} · {} {} · {}",
        position.language,
        ui.localize("lesson", "Lesson"),
        position.lesson.number(),
        day
    )
}

fn draw_notice(frame: &mut Frame, area: Rect, message: &str, fg: Color) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    frame.render_widget(
        Paragraph::new(message)
            .style(Style::default().fg(fg))
            .alignment(Alignment::Center),
        middle,
    );
}

fn draw_error_view(frame: &mut Frame, area: Rect, message: &str, palette: Palette) {
    let error_paragraph = Paragraph::new(message)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(palette.error))
                .title(" r to retry "),
        )
        .style(Style::default().fg(palette.error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(error_paragraph, area);
}
