use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the reader screen.
///
/// Components get their data as struct fields ("props") and render into a
/// `Frame` within a given `Rect`. `render` takes `&mut self` so a component
/// can update presentation state it borrows, such as a scroll offset, during
/// the render pass.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// What the component reports back to the event loop.
    type Event;

    /// Handle a low-level `TuiEvent`, optionally returning a higher-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
