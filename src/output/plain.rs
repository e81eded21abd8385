//! Plain-text encoding.

use std::fmt::Write as _;

use chrono::{Duration, NaiveDate};

use super::View;
use crate::core::{DueDate, Priority, Reminder, ReminderList};

/// Renders views as human-readable lines.
#[derive(Debug, Clone, Copy)]
pub struct PlainEncoder {
    today: NaiveDate,
}

impl PlainEncoder {
    /// Creates an encoder that describes due dates relative to `today`.
    #[must_use]
    pub const fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Renders `view`. Sequences are one `[n] `-prefixed line per item.
    #[must_use]
    pub fn encode(&self, view: View<'_>) -> String {
        self.encode_labeled(view, None)
    }

    /// Renders `view`, prefixing a single item with `label`.
    #[must_use]
    pub fn encode_labeled(&self, view: View<'_>, label: Option<&str>) -> String {
        let label = label.unwrap_or_default();
        match view {
            View::List(list) => format!("{label}{}", list_line(list)),
            View::Reminder(reminder) => format!("{label}{}", self.reminder_line(reminder, false)),
            View::Lists(lists) => numbered(lists.iter().map(list_line)),
            View::Reminders { items, show_list } => {
                numbered(items.iter().map(|r| self.reminder_line(r, show_list)))
            }
        }
    }

    fn reminder_line(&self, reminder: &Reminder, show_list: bool) -> String {
        let mut line = one_line(&reminder.title);
        if let Some(notes) = reminder.notes.as_deref().filter(|n| !n.is_empty()) {
            let _ = write!(line, " ({})", one_line(notes));
        }
        if let Some(due) = &reminder.due_date {
            let _ = write!(line, " (due {})", self.describe_due(due));
        }
        if reminder.priority != Priority::None {
            let _ = write!(line, " (priority: {})", reminder.priority);
        }
        if show_list {
            let _ = write!(line, " (list: {})", one_line(&reminder.list_title));
        }
        if reminder.completed {
            line.push_str(" (completed)");
        }
        line
    }

    fn describe_due(&self, due: &DueDate) -> String {
        let date = due.date();
        let day = if date == self.today {
            "today".to_string()
        } else if Some(date) == self.today.checked_add_signed(Duration::days(1)) {
            "tomorrow".to_string()
        } else if Some(date) == self.today.checked_sub_signed(Duration::days(1)) {
            "yesterday".to_string()
        } else {
            date.format("%Y-%m-%d").to_string()
        };

        match due.time() {
            Some(time) => format!("{day} at {}", time.format("%H:%M")),
            None => day,
        }
    }
}

fn list_line(list: &ReminderList) -> String {
    format!("{} (id: {})", one_line(&list.title), list.id)
}

/// Line breaks become spaces so every item stays on one line.
fn one_line(text: &str) -> String {
    text.replace(['\n', '\r'], " ")
}

fn numbered(lines: impl Iterator<Item = String>) -> String {
    lines
        .enumerate()
        .map(|(i, line)| format!("[{i}] {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap_or_default()
    }

    fn reminder(title: &str) -> Reminder {
        Reminder {
            id: format!("ID-{title}"),
            list_id: "L".to_string(),
            list_title: "Groceries".to_string(),
            title: title.to_string(),
            notes: None,
            completed: false,
            priority: Priority::None,
            due_date: None,
            url: None,
            alarm: None,
            created_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_sequence_lines_are_numbered() {
        let encoder = PlainEncoder::new(today());
        let items = [reminder("a"), reminder("b"), reminder("c")];
        let out = encoder.encode(View::Reminders {
            items: &items,
            show_list: false,
        });
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines, ["[0] a", "[1] b", "[2] c"]);
    }

    #[test]
    fn test_list_sequence() {
        let encoder = PlainEncoder::new(today());
        let lists = [ReminderList {
            id: "X1".to_string(),
            title: "Work".to_string(),
            source_id: String::new(),
        }];
        assert_eq!(encoder.encode(View::Lists(&lists)), "[0] Work (id: X1)");
    }

    #[test]
    fn test_empty_sequence_is_empty() {
        let encoder = PlainEncoder::new(today());
        assert_eq!(encoder.encode(View::Lists(&[])), "");
    }

    #[test]
    fn test_reminder_annotations() {
        let encoder = PlainEncoder::new(today());
        let mut r = reminder("Milk");
        r.notes = Some("2%".to_string());
        r.priority = Priority::High;
        r.completed = true;
        r.set_due_date(today().succ_opt().map(DueDate::Day));
        assert_eq!(
            encoder.encode_labeled(View::Reminder(&r), Some("Updated: ")),
            "Updated: Milk (2%) (due tomorrow) (priority: high) (completed)"
        );
    }

    #[test]
    fn test_show_list_annotation() {
        let encoder = PlainEncoder::new(today());
        let items = [reminder("Milk")];
        assert_eq!(
            encoder.encode(View::Reminders {
                items: &items,
                show_list: true
            }),
            "[0] Milk (list: Groceries)"
        );
    }

    #[test]
    fn test_due_descriptions() {
        let encoder = PlainEncoder::new(today());
        let mut r = reminder("x");
        r.set_due_date(today().and_hms_opt(9, 5, 0).map(DueDate::At));
        assert_eq!(encoder.encode(View::Reminder(&r)), "x (due today at 09:05)");

        r.set_due_date(today().pred_opt().map(DueDate::Day));
        assert_eq!(encoder.encode(View::Reminder(&r)), "x (due yesterday)");

        r.set_due_date(NaiveDate::from_ymd_opt(2024, 12, 24).map(DueDate::Day));
        assert_eq!(encoder.encode(View::Reminder(&r)), "x (due 2024-12-24)");
    }

    #[test]
    fn test_line_breaks_stay_within_one_item() {
        let encoder = PlainEncoder::new(today());
        let mut a = reminder("a");
        a.notes = Some("x\ny".to_string());
        let mut b = reminder("b\r\nc");
        b.list_title = "Two\nLines".to_string();
        let items = [a, b];
        let out = encoder.encode(View::Reminders {
            items: &items,
            show_list: true,
        });
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(
            lines,
            ["[0] a (x y) (list: Groceries)", "[1] b  c (list: Two Lines)"]
        );
    }

    #[test]
    fn test_non_empty_title_gives_non_empty_line() {
        let encoder = PlainEncoder::new(today());
        assert!(!encoder.encode(View::Reminder(&reminder("t"))).is_empty());
    }
}
