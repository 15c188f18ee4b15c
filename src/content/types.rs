use log::warn;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Day label that marks the Sabbath introduction day.
pub const SABBATH_LABEL: &str = "Sabbath Afternoon";
/// Day labels that mark the end-of-lesson review.
pub const REVIEW_LABELS: [&str; 2] = ["Friday", "General Review"];

/// Shape of a lesson day, derived from its `day` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Sabbath,
    FridayReview,
    Weekday,
}

impl DayKind {
    /// The single place day labels are interpreted.
    pub fn classify(label: &str) -> DayKind {
        match label {
            SABBATH_LABEL => DayKind::Sabbath,
            l if REVIEW_LABELS.contains(&l) => DayKind::FridayReview,
            _ => DayKind::Weekday,
        }
    }
}

/// Content for one lesson day.
///
/// Only `day` and `title` are read by navigation; the full payload is kept
/// as-is for the view. A new fetch replaces the whole record.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub day: String,
    pub title: Option<String>,
    payload: Value,
}

impl DayRecord {
    pub fn from_value(payload: Value) -> Self {
        let day = payload
            .get("day")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let title = payload
            .get("title")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self {
            day,
            title,
            payload,
        }
    }

    pub fn kind(&self) -> DayKind {
        DayKind::classify(&self.day)
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// A Markdown/plain text field, or `None` when missing or empty.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.payload
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Weekday question entries.
    pub fn entries(&self) -> Vec<Entry> {
        self.list_field("entries")
    }

    pub fn sabbath_questions(&self) -> Vec<SabbathQuestion> {
        self.list_field("sabbathQuestions")
    }

    /// `fundamentalBelief`, with `statements` as the older field name.
    pub fn fundamental_belief(&self) -> Option<&str> {
        self.text_field("fundamentalBelief")
            .or_else(|| self.text_field("statements"))
    }

    pub fn media(&self) -> Media {
        self.payload
            .get("media")
            .cloned()
            .and_then(|m| serde_json::from_value(m).ok())
            .unwrap_or_default()
    }

    fn list_field<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Vec<T> {
        let Some(value) = self.payload.get(name) else {
            return Vec::new();
        };
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!("Ignoring malformed '{}' list: {}", name, e);
            Vec::new()
        })
    }
}

/// A weekday entry. Numbered entries are study questions with a note;
/// unnumbered ones are reflective prompts.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_number")]
    pub number: Option<u32>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub scripture: Vec<String>,
    #[serde(default)]
    pub author_note: Option<String>,
}

impl Entry {
    /// Study question number. `0` counts as unnumbered.
    pub fn question_number(&self) -> Option<u32> {
        self.number.filter(|n| *n > 0)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SabbathQuestion {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Media {
    #[serde(default)]
    pub audio: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
}

/// Accepts `3`, `"3"`, `null`, or an empty string.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Localized UI strings for one language.
///
/// An empty map is a valid state: every lookup then returns its fallback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiStrings {
    strings: Map<String, Value>,
}

impl UiStrings {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(strings) => Self { strings },
            _ => {
                warn!("UI strings are not an object; using fallbacks");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn localize(&self, key: &str, fallback: &str) -> String {
        self.strings
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    }

    /// Looks a day label up in `dayNames` by its lowercased form.
    pub fn localize_day(&self, label: &str) -> String {
        self.strings
            .get("dayNames")
            .and_then(|names| names.get(label.to_lowercase()))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(label)
            .to_string()
    }
}
