//! Reminder records, creation requests and field-level patches.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::due::DueDate;
use super::list::ReminderList;
use super::priority::Priority;
use super::resolver::Resolvable;

/// A single task record, as last read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// Store-assigned identifier.
    pub id: String,
    /// Identifier of the owning list.
    pub list_id: String,
    /// Title of the owning list at the time of the read.
    #[serde(rename = "list")]
    pub list_title: String,
    /// Title.
    pub title: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Priority level.
    pub priority: Priority,
    /// Due date, with or without a time of day.
    pub due_date: Option<DueDate>,
    /// Attached URL.
    pub url: Option<String>,
    /// Absolute alarm, derived from a timed due date.
    pub alarm: Option<NaiveDateTime>,
    /// When the store created the record.
    pub created_at: NaiveDateTime,
}

impl Reminder {
    /// Replaces the due date, keeping the alarm in step with it.
    pub fn set_due_date(&mut self, due_date: Option<DueDate>) {
        self.alarm = due_date.as_ref().and_then(DueDate::alarm);
        self.due_date = due_date;
    }

    /// Reassigns the reminder to `list`.
    pub fn move_to(&mut self, list: &ReminderList) {
        self.list_id.clone_from(&list.id);
        self.list_title.clone_from(&list.title);
    }
}

impl Resolvable for Reminder {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}

/// Fields for a reminder that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewReminder {
    /// Identifier of the list to add to.
    pub list_id: String,
    /// Title.
    pub title: String,
    /// Notes.
    pub notes: Option<String>,
    /// Priority.
    pub priority: Priority,
    /// Due date.
    pub due_date: Option<DueDate>,
    /// URL.
    pub url: Option<String>,
    /// Alarm; set by the command layer from a timed due date.
    pub alarm: Option<NaiveDateTime>,
}

/// An edit to an existing reminder.
///
/// Only fields that are `Some` are written; everything else keeps its prior
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderPatch {
    /// New title.
    pub title: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New completion flag.
    pub completed: Option<bool>,
    /// New priority.
    pub priority: Option<Priority>,
    /// New due date.
    pub due_date: Option<DueDate>,
    /// New URL.
    pub url: Option<String>,
}

impl ReminderPatch {
    /// Patch that only changes the completion flag.
    #[must_use]
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Writes the supplied fields onto `reminder`.
    pub fn apply(&self, reminder: &mut Reminder) {
        if let Some(title) = &self.title {
            reminder.title.clone_from(title);
        }
        if let Some(notes) = &self.notes {
            reminder.notes = Some(notes.clone());
        }
        if let Some(completed) = self.completed {
            reminder.completed = completed;
        }
        if let Some(priority) = self.priority {
            reminder.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            reminder.set_due_date(Some(due_date));
        }
        if let Some(url) = &self.url {
            reminder.url = Some(url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(h, 0, 0))
            .unwrap_or_default()
    }

    fn sample() -> Reminder {
        Reminder {
            id: "R1".to_string(),
            list_id: "L1".to_string(),
            list_title: "Groceries".to_string(),
            title: "Milk".to_string(),
            notes: None,
            completed: false,
            priority: Priority::Medium,
            due_date: Some(DueDate::At(at(9))),
            url: Some("https://example.com".to_string()),
            alarm: Some(at(9)),
            created_at: at(8),
        }
    }

    #[test]
    fn test_notes_only_patch_keeps_other_fields() {
        let mut reminder = sample();
        let before = reminder.clone();
        let patch = ReminderPatch {
            notes: Some("2% only".to_string()),
            ..ReminderPatch::default()
        };
        patch.apply(&mut reminder);

        assert_eq!(reminder.notes.as_deref(), Some("2% only"));
        assert_eq!(reminder.title, before.title);
        assert_eq!(reminder.completed, before.completed);
        assert_eq!(reminder.priority, before.priority);
        assert_eq!(reminder.url, before.url);
        assert_eq!(reminder.due_date, before.due_date);
        assert_eq!(reminder.alarm, before.alarm);
    }

    #[test]
    fn test_untimed_due_date_clears_alarm() {
        let mut reminder = sample();
        let patch = ReminderPatch {
            due_date: Some(DueDate::Day(at(0).date())),
            ..ReminderPatch::default()
        };
        patch.apply(&mut reminder);
        assert!(reminder.alarm.is_none());
    }

    #[test]
    fn test_empty_patch() {
        assert!(ReminderPatch::default().is_empty());
        assert!(!ReminderPatch::completion(true).is_empty());
    }

    #[test]
    fn test_reminder_json_keys_are_sorted() {
        let value = serde_json::to_value(sample()).unwrap_or_default();
        let keys: Vec<_> = value
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        assert_eq!(
            keys,
            [
                "alarm",
                "completed",
                "created_at",
                "due_date",
                "id",
                "list",
                "list_id",
                "notes",
                "priority",
                "title",
                "url"
            ]
        );
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["due_date"], "2024-05-15T09:00:00");
        assert!(value["notes"].is_null());
    }
}
