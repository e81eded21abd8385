//! Reminders store abstraction and its SQLite backend.
//!
//! The command layer only talks to [`ReminderStore`]. Every call blocks until
//! the store has finished, so at most one store request is in flight and
//! each mutation is persisted before the next call starts.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::core::{NewReminder, Reminder, ReminderList, Source};
use crate::error::Result;

/// Fallback database path, relative to the working directory, used when no
/// per-user data directory is available.
pub const DEFAULT_DB_PATH: &str = ".reminders/reminders.db";

/// Operations the host reminders store provides.
///
/// Implementations own all persisted lists and reminders. Callers never
/// cache what they read; each operation starts from a fresh snapshot.
pub trait ReminderStore {
    /// All sources (accounts) in store order.
    fn sources(&self) -> Result<Vec<Source>>;

    /// All writable lists in store order.
    fn lists(&self) -> Result<Vec<ReminderList>>;

    /// Creates and persists a list titled `title` under `source`.
    fn create_list(&mut self, source: &Source, title: &str) -> Result<ReminderList>;

    /// Persists the title of an existing list.
    fn update_list(&mut self, list: &ReminderList) -> Result<()>;

    /// Removes a list and its reminders.
    fn delete_list(&mut self, list: &ReminderList) -> Result<()>;

    /// Reminders belonging to any of `lists`, in store order.
    fn reminders(&self, lists: &[ReminderList]) -> Result<Vec<Reminder>>;

    /// Creates and persists a reminder.
    fn create_reminder(&mut self, reminder: &NewReminder) -> Result<Reminder>;

    /// Persists every field of an existing reminder.
    fn update_reminder(&mut self, reminder: &Reminder) -> Result<()>;

    /// Removes a reminder.
    fn delete_reminder(&mut self, reminder: &Reminder) -> Result<()>;
}
