//! # TUI Components
//!
//! ## Stateless components (props-based rendering)
//!
//! Built fresh each frame from `App` data:
//! - `TitleBar`: location, lesson title, status message
//! - `NavBar`: Prev/Next buttons, the day-7 forward button, key hints
//! - `QuarterView`: next-quarter introduction
//!
//! ## Stateful components
//!
//! Persistent state lives in `TuiState`:
//! - `LessonView` / `LessonViewState`: the scrollable day body
//! - `NoteEditor`: editing one note, emits `EditorEvent`
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── lesson_view.rs
//! ├── nav_bar.rs
//! ├── note_editor.rs
//! └── quarter_view.rs
//! ```

pub mod lesson_view;
mod nav_bar;
pub mod note_editor;
mod quarter_view;
mod title_bar;

pub use lesson_view::{LessonView, LessonViewState, note_slots};
pub use nav_bar::NavBar;
pub use note_editor::{EditorEvent, NoteEditor};
pub use quarter_view::QuarterView;
pub use title_bar::TitleBar;
