//! Reminder lists and the sources (accounts) that own them.

use serde::Serialize;

use super::resolver::Resolvable;

/// An account or provider that lists belong to (e.g. a cloud account or
/// local-only storage).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    /// Store-assigned identifier.
    pub id: String,
    /// Display name.
    pub title: String,
}

/// A named collection of reminders.
///
/// `id` is assigned by the store and never changes. Titles are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReminderList {
    /// Store-assigned identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Identifier of the owning [`Source`].
    #[serde(skip)]
    pub source_id: String,
}

impl Resolvable for ReminderList {
    fn identifier(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.title
    }
}
