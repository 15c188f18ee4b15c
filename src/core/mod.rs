//! # Core Reader Logic
//!
//! Lesson navigation and content resolution. It knows nothing about any
//! specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Position / Nav state │
//!                    │  • LessonResolver       │
//!                    │  • Action + update()    │
//!                    │  • Storage              │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  content   │
//!     │  Adapter   │                          │  (reqwest) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`position`]: `Position`, `LessonId`, quarter arithmetic
//! - [`navigation`]: `NavigationState`, the only place a position changes
//! - [`resolver`]: `LessonResolver`, fetch + classify + forward affordance
//! - [`state`]: The `App` struct, all reader state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`storage`]: progress, notes, and theme on disk
//! - [`config`]: `~/.hobd/config.toml` and override resolution

pub mod action;
pub mod config;
pub mod navigation;
pub mod position;
pub mod resolver;
pub mod state;
pub mod storage;
