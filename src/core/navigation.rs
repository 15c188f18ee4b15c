//! # Navigation State
//!
//! Owns the current [`Position`]. Every successful change is written through
//! to the progress store before the operation returns; rejected moves write
//! nothing.

use log::{debug, info};

use crate::core::position::{LAST_DAY, LessonId, Position, FIRST_DAY};
use crate::core::storage::ProgressStore;

/// Signal that the reader is leaving the lesson/day hierarchy for a quarter intro.
/// Quarters are addressed as `intro-qN`, not by lesson and day, so the position
/// itself is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuarterRedirect(pub u32);

pub struct NavigationState {
    position: Position,
    store: Box<dyn ProgressStore>,
}

impl NavigationState {
    pub fn new(position: Position, store: Box<dyn ProgressStore>) -> Self {
        Self { position, store }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Moves one day forward (`+1`) or back (`-1`).
    ///
    /// Returns `false` without touching anything when the move would leave
    /// the week. Going past the last day is the forward affordance's job.
    pub fn step_day(&mut self, delta: i8) -> bool {
        let target = i16::from(self.position.day) + i16::from(delta);
        if target < i16::from(FIRST_DAY) || target > i16::from(LAST_DAY) {
            debug!("step_day({}) rejected at {}", delta, self.position);
            return false;
        }
        self.position.day = target as u8;
        self.persist();
        true
    }

    pub fn jump_to_lesson_start(&mut self, lesson: LessonId) {
        self.position.lesson = lesson;
        self.position.day = FIRST_DAY;
        self.persist();
    }

    pub fn jump_to_quarter(&self, quarter: u32) -> QuarterRedirect {
        info!("Leaving {} for quarter {}", self.position, quarter);
        QuarterRedirect(quarter)
    }

    pub fn persist(&self) {
        self.store.save_progress(&self.position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingProgressStore;

    fn nav_at(day: u8) -> (NavigationState, RecordingProgressStore) {
        let store = RecordingProgressStore::default();
        let position = Position::new("en", LessonId::from_number(4), day).unwrap();
        (NavigationState::new(position, Box::new(store.clone())), store)
    }

    #[test]
    fn test_step_round_trip() {
        for day in FIRST_DAY..=LAST_DAY {
            let (mut nav, _) = nav_at(day);
            if nav.step_day(1) {
                assert!(nav.step_day(-1));
            }
            assert_eq!(nav.position().day, day);

            let (mut nav, _) = nav_at(day);
            if nav.step_day(-1) {
                assert!(nav.step_day(1));
            }
            assert_eq!(nav.position().day, day);
        }
    }

    #[test]
    fn test_step_never_leaves_week() {
        let (mut nav, store) = nav_at(LAST_DAY);
        assert!(!nav.step_day(1));
        assert_eq!(nav.position().day, LAST_DAY);
        assert!(store.saved().is_empty());

        let (mut nav, store) = nav_at(FIRST_DAY);
        assert!(!nav.step_day(-1));
        assert_eq!(nav.position().day, FIRST_DAY);
        assert!(store.saved().is_empty());
    }

    #[test]
    fn test_every_change_is_persisted() {
        let (mut nav, store) = nav_at(2);
        nav.step_day(1);
        nav.step_day(-1);
        nav.jump_to_lesson_start(LessonId::from_number(5));

        let saved: Vec<String> = store.saved().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            saved,
            vec!["en/lesson-04/day-3", "en/lesson-04/day-2", "en/lesson-05/day-1"]
        );
    }

    #[test]
    fn test_jump_to_quarter_leaves_position() {
        let (nav, store) = nav_at(7);
        assert_eq!(nav.jump_to_quarter(2), QuarterRedirect(2));
        assert_eq!(nav.position().day, 7);
        assert!(store.saved().is_empty());
    }
}
