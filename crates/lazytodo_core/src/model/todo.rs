//! Todo domain model.
//!
//! # Responsibility
//! - Define the persisted todo record and its creation/patch inputs.
//! - Implement shallow-merge semantics for partial updates.
//!
//! # Invariants
//! - `title` is non-empty after trimming.
//! - `id` is unique within the todo collection.
//! - Wire names are camelCase (`dueDate`, `createdAt`); `_id` is accepted on read.

use super::validation::{validate_title, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque todo identifier.
pub type TodoId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unsupported priority `{other}`; expected low|medium|high"
            )),
        }
    }
}

/// Opt-in reminder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(default)]
    pub enabled: bool,
}

impl Reminder {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }
}

/// Persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(alias = "_id")]
    pub id: TodoId,
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_due_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder: Reminder,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Builds a new open todo from a draft.
    pub fn from_draft(id: TodoId, draft: TodoDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            reminder: draft.reminder,
            completed: false,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Due date to remind about, when the reminder is enabled.
    pub fn reminder_date(&self) -> Option<NaiveDate> {
        if self.reminder.enabled {
            self.due_date
        } else {
            None
        }
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == Some(date)
    }
}

/// Input for creating a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub reminder: Reminder,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_reminder(mut self, enabled: bool) -> Self {
        self.reminder = Reminder { enabled };
        self
    }
}

/// Partial update merged shallowly into an existing todo.
///
/// `None` leaves a field untouched. For optional fields, `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub reminder: Option<Reminder>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges set fields into `todo`; `id` and `created_at` never change.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(reminder) = self.reminder {
            todo.reminder = reminder;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.is_empty()))
}

// Older documents hold form values: "" for unset, or a full ISO timestamp.
fn lenient_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map(Some)
        .map_err(|err| serde::de::Error::custom(format!("invalid dueDate `{raw}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::{Priority, Reminder, Todo, TodoDraft, TodoPatch};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn sample() -> Todo {
        Todo::from_draft(
            "t1".to_string(),
            TodoDraft::new("Buy milk")
                .with_due_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
                .with_reminder(true),
            Utc.with_ymd_and_hms(2023, 12, 30, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "t1");
        assert_eq!(json["dueDate"], "2024-01-01");
        assert_eq!(json["reminder"]["enabled"], true);
        assert_eq!(json["priority"], "medium");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], "2023-12-30T08:00:00Z");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn deserializes_legacy_form_values() {
        let raw = r#"{
            "_id": "1704067200000",
            "title": "Legacy",
            "description": "",
            "priority": "high",
            "dueDate": "",
            "reminder": {"enabled": false},
            "completed": true,
            "createdAt": "2024-01-01T00:00:00.000Z"
        }"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.id, "1704067200000");
        assert_eq!(todo.description, None);
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.priority, Priority::High);
        assert!(todo.completed);
    }

    #[test]
    fn deserializes_timestamp_due_date_as_calendar_date() {
        let raw = r#"{"id":"a","title":"x","dueDate":"2024-03-05T00:00:00.000Z",
            "createdAt":"2024-01-01T00:00:00Z"}"#;
        let todo: Todo = serde_json::from_str(raw).unwrap();
        assert_eq!(todo.due_date, NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(todo.reminder, Reminder::default());
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let original = sample();
        let mut patched = original.clone();
        let patch = TodoPatch::default();

        assert!(patch.is_empty());
        patch.apply_to(&mut patched);
        assert_eq!(patched, original);
    }

    #[test]
    fn patch_can_clear_optional_fields() {
        let mut todo = sample();
        todo.description = Some("2 liters".to_string());

        TodoPatch {
            description: Some(None),
            due_date: Some(None),
            priority: Some(Priority::Low),
            ..TodoPatch::default()
        }
        .apply_to(&mut todo);

        assert_eq!(todo.description, None);
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.priority, Priority::Low);
        assert_eq!(todo.reminder_date(), None);
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }
}
