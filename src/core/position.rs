//! Where the reader is: language, lesson, and day.

use std::fmt;

pub const FIRST_DAY: u8 = 1;
pub const LAST_DAY: u8 = 7;
pub const LESSONS_PER_QUARTER: u32 = 13;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Quarter containing the given lesson number. Quarters start at 1.
pub fn quarter_for(lesson_number: u32) -> u32 {
    lesson_number.div_ceil(LESSONS_PER_QUARTER)
}

/// A lesson identifier such as `lesson-07`.
///
/// Always written zero-padded to two digits. Parsing takes everything after
/// the first `-`, so `lesson-7` and `lesson-107` are read as well, and the
/// id is normalised on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonId {
    text: String,
    number: u32,
}

impl LessonId {
    pub fn from_number(number: u32) -> Self {
        Self {
            text: format!("lesson-{number:02}"),
            number,
        }
    }

    /// Parses `lesson-NN`. Returns `None` when there is no `-`, the rest is
    /// not a number, or the number is 0.
    pub fn parse(text: &str) -> Option<Self> {
        let (_, digits) = text.split_once('-')?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let number: u32 = digits.parse().ok()?;
        (number > 0).then(|| Self::from_number(number))
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// `None` once the numbering runs out.
    pub fn next(&self) -> Option<Self> {
        self.number.checked_add(1).map(Self::from_number)
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Default for LessonId {
    fn default() -> Self {
        Self::from_number(1)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub language: String,
    pub lesson: LessonId,
    /// Always within `FIRST_DAY..=LAST_DAY`.
    pub day: u8,
}

impl Position {
    pub fn new(language: impl Into<String>, lesson: LessonId, day: u8) -> Option<Self> {
        is_valid_day(day).then(|| Self {
            language: language.into(),
            lesson,
            day,
        })
    }

    pub fn is_last_day(&self) -> bool {
        self.day == LAST_DAY
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            lesson: LessonId::default(),
            day: FIRST_DAY,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/day-{}", self.language, self.lesson, self.day)
    }
}

pub fn is_valid_day(day: u8) -> bool {
    (FIRST_DAY..=LAST_DAY).contains(&day)
}
