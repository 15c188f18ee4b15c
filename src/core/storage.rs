//! # Local Storage
//!
//! A small key-value store for progress, notes, and theme, persisted to
//! `~/.hobd/storage.json`. Keys live under the `e-hbd.` namespace:
//!
//! ```text
//! e-hbd.progress                      {"lang":"en","lesson":"lesson-03","day":4}
//! e-hbd.theme                         dark | light | system
//! e-hbd.en.lesson-03.day-4.q2         note for question 2
//! e-hbd.en.lesson-03.day-7.review     Friday review note
//! ```
//!
//! Writes go to disk immediately via atomic rename (write `.tmp`, then `rename()`).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::position::{LessonId, Position, is_valid_day};

pub const NAMESPACE: &str = "e-hbd";
const PROGRESS_KEY: &str = "progress";
const THEME_KEY: &str = "theme";

// ============================================================================
// Backends
// ============================================================================

pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk, loaded once and rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store;
    /// an unreadable or corrupt file is reported and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Ignoring corrupt store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        atomic_write_json(&self.path, &self.entries)
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Returns `~/.hobd/storage.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hobd").join("storage.json"))
}

// ============================================================================
// Typed access
// ============================================================================

/// Persists and restores the reader's position.
pub trait ProgressStore: Send {
    /// `None` when nothing was saved or the record is unreadable.
    fn load_progress(&self) -> Option<Position>;
    fn save_progress(&self, position: &Position);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    System,
    Dark,
    Light,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Theme> {
        match s.trim().to_lowercase().as_str() {
            "system" => Some(Theme::System),
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// The terminal cannot report a colour-scheme preference, so `System` renders dark.
    pub fn effective(&self) -> Theme {
        match self {
            Theme::Light => Theme::Light,
            Theme::Dark | Theme::System => Theme::Dark,
        }
    }

    pub fn toggled(&self) -> Theme {
        match self.effective() {
            Theme::Dark => Theme::Light,
            _ => Theme::Dark,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a note is attached to within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteSlot {
    Question(u32),
    Review,
}

/// Key for a note, e.g. `en.lesson-03.day-4.q2`.
pub fn note_key(position: &Position, slot: NoteSlot) -> String {
    let suffix = match slot {
        NoteSlot::Question(n) => format!("q{n}"),
        NoteSlot::Review => "review".to_string(),
    };
    format!(
        "{}.{}.day-{}.{}",
        position.language, position.lesson, position.day, suffix
    )
}

/// Progress record as stored. Field names match what earlier versions wrote.
#[derive(Debug, Serialize, Deserialize)]
struct StoredProgress {
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    lesson: Option<String>,
    #[serde(default)]
    day: Option<Value>,
}

impl StoredProgress {
    /// Each missing or invalid field falls back to the initial position's value.
    fn into_position(self) -> Position {
        let initial = Position::default();
        let language = self
            .lang
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(initial.language);
        let lesson = self
            .lesson
            .as_deref()
            .and_then(LessonId::parse)
            .unwrap_or(initial.lesson);
        let day = self
            .day
            .and_then(|d| match d {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .and_then(|d| u8::try_from(d).ok())
            .filter(|d| is_valid_day(*d))
            .unwrap_or(initial.day);
        Position {
            language,
            lesson,
            day,
        }
    }
}

/// Shared handle over a key-value backend. Cloning shares the backend.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Mutex<Box<dyn KeyValueStore>>>,
}

impl Storage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn KeyValueStore>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn namespaced(key: &str) -> String {
        format!("{NAMESPACE}.{key}")
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(&Self::namespaced(key))
    }

    /// Failures are logged, never raised.
    pub fn set(&self, key: &str, value: &str) {
        let full_key = Self::namespaced(key);
        match self.lock().set(&full_key, value) {
            Ok(()) => debug!("Stored {}", full_key),
            Err(e) => warn!("Failed to store {}: {}", full_key, e),
        }
    }

    pub fn note(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    pub fn save_note(&self, key: &str, text: &str) {
        self.set(key, text);
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|t| Theme::parse(&t))
            .unwrap_or_default()
    }

    pub fn save_theme(&self, theme: Theme) {
        self.set(THEME_KEY, theme.as_str());
    }
}

impl ProgressStore for Storage {
    fn load_progress(&self) -> Option<Position> {
        let raw = self.get(PROGRESS_KEY)?;
        match serde_json::from_str::<Option<StoredProgress>>(&raw) {
            Ok(stored) => stored.map(StoredProgress::into_position),
            Err(e) => {
                warn!("Ignoring unreadable progress record: {}", e);
                None
            }
        }
    }

    fn save_progress(&self, position: &Position) {
        let stored = StoredProgress {
            lang: Some(position.language.clone()),
            lesson: Some(position.lesson.to_string()),
            day: Some(Value::from(position.day)),
        };
        match serde_json::to_string(&stored) {
            Ok(json) => self.set(PROGRESS_KEY, &json),
            Err(e) => warn!("Failed to encode progress: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_round_trip() {
        let storage = Storage::in_memory();
        assert!(storage.load_progress().is_none());

        let position = Position::new("af", LessonId::from_number(12), 5).unwrap();
        storage.save_progress(&position);
        assert_eq!(storage.load_progress(), Some(position));
        assert_eq!(
            storage.get("progress").unwrap(),
            r#"{"lang":"af","lesson":"lesson-12","day":5}"#
        );
    }

    #[test]
    fn test_corrupt_progress_is_ignored() {
        let storage = Storage::in_memory();
        storage.set("progress", "{not json");
        assert!(storage.load_progress().is_none());

        storage.set("progress", "null");
        assert!(storage.load_progress().is_none());
    }

    #[test]
    fn test_invalid_fields_fall_back_individually() {
        let storage = Storage::in_memory();
        storage.set("progress", r#"{"lang":"pt","lesson":"lesson-xx","day":9}"#);
        let position = storage.load_progress().unwrap();
        assert_eq!(position.language, "pt");
        assert_eq!(position.lesson, LessonId::from_number(1));
        assert_eq!(position.day, 1);
    }

    #[test]
    fn test_progress_accepts_string_day_and_wide_lesson() {
        let storage = Storage::in_memory();
        storage.set("progress", r#"{"lang":"en","lesson":"lesson-104","day":"3"}"#);
        let position = storage.load_progress().unwrap();
        assert_eq!(position.lesson.number(), 104);
        assert_eq!(position.day, 3);
    }

    #[test]
    fn test_out_of_range_lesson_falls_back() {
        let storage = Storage::in_memory();
        storage.set("progress", r#"{"lang":"en","lesson":"lesson-4294967296","day":7}"#);
        let position = storage.load_progress().unwrap();
        assert_eq!(position.lesson, LessonId::from_number(1));
        assert_eq!(position.day, 7);

        storage.set("progress", r#"{"lang":"en","lesson":"lesson-4294967295","day":7}"#);
        let position = storage.load_progress().unwrap();
        assert_eq!(position.lesson.next(), None);
    }

    #[test]
    fn test_short_lesson_id_is_padded() {
        let storage = Storage::in_memory();
        storage.set("progress", r#"{"lang":"en","lesson":"lesson-5","day":2}"#);
        let position = storage.load_progress().unwrap();
        assert_eq!(position.to_string(), "en/lesson-05/day-2");
    }

    #[test]
    fn test_note_keys() {
        let position = Position::new("en", LessonId::from_number(3), 4).unwrap();
        assert_eq!(note_key(&position, NoteSlot::Question(2)), "en.lesson-03.day-4.q2");
        assert_eq!(note_key(&position, NoteSlot::Review), "en.lesson-03.day-4.review");
    }

    #[test]
    fn test_notes_are_namespaced() {
        let storage = Storage::in_memory();
        assert_eq!(storage.note("en.lesson-01.day-2.q1"), "");
        storage.save_note("en.lesson-01.day-2.q1", "Grace");
        assert_eq!(storage.note("en.lesson-01.day-2.q1"), "Grace");
        assert_eq!(
            storage.lock().get("e-hbd.en.lesson-01.day-2.q1").as_deref(),
            Some("Grace")
        );
    }

    #[test]
    fn test_theme_defaults_and_toggles() {
        let storage = Storage::in_memory();
        assert_eq!(storage.theme(), Theme::System);
        assert_eq!(Theme::System.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);

        storage.save_theme(Theme::Light);
        assert_eq!(storage.theme(), Theme::Light);

        storage.set("theme", "purple");
        assert_eq!(storage.theme(), Theme::System);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileStore::open(&path);
        assert!(store.get("e-hbd.theme").is_none());
        store.set("e-hbd.theme", "dark").unwrap();
        assert!(!path.with_extension("tmp").exists());

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("e-hbd.theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "<<garbage>>").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("e-hbd.progress").is_none());
        assert_eq!(store.path(), path.as_path());
    }
}
