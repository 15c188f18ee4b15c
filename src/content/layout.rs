//! Resource URL builders: one source of truth for where content lives.
//!
//! ```text
//! {base}/ui/{lang}.json
//! {base}/content/{lang}/lesson-NN/day-D.json
//! {base}/content/{lang}/intro-qQ/index.json
//! ```

use crate::core::position::LessonId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    base_url: String,
}

impl ContentLayout {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins a root-relative path onto the base, so nested paths never double up slashes.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn ui_url(&self, language: &str) -> String {
        self.url(&format!("ui/{language}.json"))
    }

    pub fn day_url(&self, language: &str, lesson: &LessonId, day: u8) -> String {
        self.url(&format!("content/{language}/{lesson}/day-{day}.json"))
    }

    /// Day 1 of a lesson; probing it answers "does this lesson exist?".
    pub fn lesson_start_url(&self, language: &str, lesson: &LessonId) -> String {
        self.day_url(language, lesson, 1)
    }

    pub fn quarter_index_url(&self, language: &str, quarter: u32) -> String {
        self.url(&format!("content/{language}/intro-q{quarter}/index.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = ContentLayout::new("https://example.org/");
        let lesson = LessonId::from_number(3);
        assert_eq!(layout.ui_url("en"), "https://example.org/ui/en.json");
        assert_eq!(
            layout.day_url("en", &lesson, 5),
            "https://example.org/content/en/lesson-03/day-5.json"
        );
        assert_eq!(
            layout.lesson_start_url("af", &lesson),
            "https://example.org/content/af/lesson-03/day-1.json"
        );
        assert_eq!(
            layout.quarter_index_url("en", 2),
            "https://example.org/content/en/intro-q2/index.json"
        );
    }

    #[test]
    fn test_base_url_keeps_subpath() {
        let layout = ContentLayout::new("http://localhost:8080/hobd");
        assert_eq!(layout.ui_url("en"), "http://localhost:8080/hobd/ui/en.json");
    }
}
