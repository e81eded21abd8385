//! SQLite-backed [`ReminderStore`].

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use tracing::debug;
use uuid::Uuid;

use super::ReminderStore;
use super::schema::{DEFAULT_SOURCE_TITLE, SCHEMA_SQL, TIMESTAMP_FORMAT};
use crate::core::{DueDate, NewReminder, Priority, Reminder, ReminderList, Source};
use crate::error::{Result, StorageError};

const REMINDER_COLUMNS: &str = "r.id, r.list_id, l.title, r.title, r.notes, r.completed, \
     r.priority, r.due_date, r.url, r.alarm, r.created_at";

/// Reminders store kept in a local SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `path` and applies the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// database cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }

        debug!(path = %path.display(), "opening reminders store");
        let conn = Connection::open(path).map_err(StorageError::from)?;
        let mut store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens a fresh in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot allocate the database.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let mut store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Applies the schema and seeds a default source into an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if a schema statement fails.
    pub fn init(&mut self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(StorageError::from)?;
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(StorageError::from)?;

        if self.sources()?.is_empty() {
            self.create_source(DEFAULT_SOURCE_TITLE)?;
        }
        Ok(())
    }

    /// Adds a source. Sources are normally managed by the host, so this is
    /// not part of [`ReminderStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_source(&mut self, title: &str) -> Result<Source> {
        let source = Source {
            id: new_id(),
            title: title.to_string(),
        };
        self.conn
            .execute(
                "INSERT INTO sources (id, title) VALUES (?1, ?2)",
                params![source.id, source.title],
            )
            .map_err(StorageError::from)?;
        debug!(id = %source.id, title, "created source");
        Ok(source)
    }

    /// Marks a list as writable or read-only. Read-only lists are hidden
    /// from [`ReminderStore::lists`].
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ListNotFound`] if no list has `id`.
    pub fn set_list_writable(&mut self, id: &str, writable: bool) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE lists SET writable = ?2 WHERE id = ?1",
                params![id, writable],
            )
            .map_err(StorageError::from)?;
        if changed == 0 {
            return Err(StorageError::ListNotFound { id: id.to_string() }.into());
        }
        Ok(())
    }
}

impl ReminderStore for SqliteStore {
    fn sources(&self) -> Result<Vec<Source>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title FROM sources ORDER BY rowid")
            .map_err(StorageError::from)?;
        let sources = stmt
            .query_map([], |row| {
                Ok(Source {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })
            .map_err(StorageError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::from)?;
        Ok(sources)
    }

    fn lists(&self) -> Result<Vec<ReminderList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, source_id FROM lists WHERE writable = 1 ORDER BY rowid")
            .map_err(StorageError::from)?;
        let lists = stmt
            .query_map([], |row| {
                Ok(ReminderList {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    source_id: row.get(2)?,
                })
            })
            .map_err(StorageError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::from)?;
        Ok(lists)
    }

    fn create_list(&mut self, source: &Source, title: &str) -> Result<ReminderList> {
        let exists: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM sources WHERE id = ?1",
                params![source.id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;
        if exists.is_none() {
            return Err(StorageError::SourceNotFound {
                id: source.id.clone(),
            }
            .into());
        }

        let list = ReminderList {
            id: new_id(),
            title: title.to_string(),
            source_id: source.id.clone(),
        };
        self.conn
            .execute(
                "INSERT INTO lists (id, source_id, title) VALUES (?1, ?2, ?3)",
                params![list.id, list.source_id, list.title],
            )
            .map_err(StorageError::from)?;
        debug!(id = %list.id, title, source = %source.title, "created list");
        Ok(list)
    }

    fn update_list(&mut self, list: &ReminderList) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE lists SET title = ?2 WHERE id = ?1",
                params![list.id, list.title],
            )
            .map_err(StorageError::from)?;
        if changed == 0 {
            return Err(StorageError::ListNotFound {
                id: list.id.clone(),
            }
            .into());
        }
        debug!(id = %list.id, title = %list.title, "updated list");
        Ok(())
    }

    fn delete_list(&mut self, list: &ReminderList) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM lists WHERE id = ?1", params![list.id])
            .map_err(StorageError::from)?;
        if changed == 0 {
            return Err(StorageError::ListNotFound {
                id: list.id.clone(),
            }
            .into());
        }
        debug!(id = %list.id, "deleted list");
        Ok(())
    }

    fn reminders(&self, lists: &[ReminderList]) -> Result<Vec<Reminder>> {
        if lists.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; lists.len()].join(", ");
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders r JOIN lists l ON l.id = r.list_id \
             WHERE r.list_id IN ({placeholders}) ORDER BY l.rowid, r.rowid"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(StorageError::from)?;
        let rows = stmt
            .query_map(params_from_iter(lists.iter().map(|l| &l.id)), ReminderRow::read)
            .map_err(StorageError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StorageError::from)?;

        rows.into_iter().map(ReminderRow::into_reminder).collect()
    }

    fn create_reminder(&mut self, reminder: &NewReminder) -> Result<Reminder> {
        let id = new_id();
        let created_at = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
        self.conn
            .execute(
                "INSERT INTO reminders \
                 (id, list_id, title, notes, completed, priority, due_date, url, alarm, created_at) \
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    reminder.list_id,
                    reminder.title,
                    reminder.notes,
                    reminder.priority.store_value(),
                    reminder.due_date.map(|d| d.to_string()),
                    reminder.url,
                    reminder.alarm.map(|a| a.format(TIMESTAMP_FORMAT).to_string()),
                    created_at,
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StorageError::ListNotFound {
                        id: reminder.list_id.clone(),
                    }
                }
                other => StorageError::from(other),
            })?;
        debug!(%id, list = %reminder.list_id, "created reminder");

        self.reminder(&id)?
            .ok_or_else(|| StorageError::ReminderNotFound { id }.into())
    }

    fn update_reminder(&mut self, reminder: &Reminder) -> Result<()> {
        let changed = self
            .conn
            .execute(
                "UPDATE reminders SET list_id = ?2, title = ?3, notes = ?4, completed = ?5, \
                 priority = ?6, due_date = ?7, url = ?8, alarm = ?9 WHERE id = ?1",
                params![
                    reminder.id,
                    reminder.list_id,
                    reminder.title,
                    reminder.notes,
                    reminder.completed,
                    reminder.priority.store_value(),
                    reminder.due_date.map(|d| d.to_string()),
                    reminder.url,
                    reminder.alarm.map(|a| a.format(TIMESTAMP_FORMAT).to_string()),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, msg)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StorageError::Persistence(msg.unwrap_or_else(|| err.to_string()))
                }
                other => StorageError::from(other),
            })?;
        if changed == 0 {
            return Err(StorageError::ReminderNotFound {
                id: reminder.id.clone(),
            }
            .into());
        }
        debug!(id = %reminder.id, "updated reminder");
        Ok(())
    }

    fn delete_reminder(&mut self, reminder: &Reminder) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?1", params![reminder.id])
            .map_err(StorageError::from)?;
        if changed == 0 {
            return Err(StorageError::ReminderNotFound {
                id: reminder.id.clone(),
            }
            .into());
        }
        debug!(id = %reminder.id, "deleted reminder");
        Ok(())
    }
}

impl SqliteStore {
    fn reminder(&self, id: &str) -> Result<Option<Reminder>> {
        let sql = format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders r JOIN lists l ON l.id = r.list_id \
             WHERE r.id = ?1"
        );
        let row = self
            .conn
            .query_row(&sql, params![id], ReminderRow::read)
            .optional()
            .map_err(StorageError::from)?;
        row.map(ReminderRow::into_reminder).transpose()
    }
}

/// A reminder row before its text columns are parsed.
struct ReminderRow {
    id: String,
    list_id: String,
    list_title: String,
    title: String,
    notes: Option<String>,
    completed: bool,
    priority: i64,
    due_date: Option<String>,
    url: Option<String>,
    alarm: Option<String>,
    created_at: String,
}

impl ReminderRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            list_id: row.get(1)?,
            list_title: row.get(2)?,
            title: row.get(3)?,
            notes: row.get(4)?,
            completed: row.get(5)?,
            priority: row.get(6)?,
            due_date: row.get(7)?,
            url: row.get(8)?,
            alarm: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn into_reminder(self) -> Result<Reminder> {
        let due_date = self
            .due_date
            .map(|s| {
                s.parse::<DueDate>()
                    .map_err(|_| StorageError::Corrupt(format!("due date '{s}' on {}", self.id)))
            })
            .transpose()?;
        let alarm = self.alarm.as_deref().map(parse_timestamp).transpose()?;
        let created_at = parse_timestamp(&self.created_at)?;

        Ok(Reminder {
            id: self.id,
            list_id: self.list_id,
            list_title: self.list_title,
            title: self.title,
            notes: self.notes,
            completed: self.completed,
            priority: Priority::from_store_value(self.priority),
            due_date,
            url: self.url,
            alarm,
            created_at,
        })
    }
}

fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, StorageError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| StorageError::Corrupt(format!("timestamp '{s}'")))
}

fn new_id() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup_store() -> SqliteStore {
        SqliteStore::in_memory().unwrap_or_else(|e| panic!("in_memory failed: {e}"))
    }

    fn local(store: &SqliteStore) -> Source {
        store
            .sources()
            .unwrap_or_else(|e| panic!("sources failed: {e}"))
            .remove(0)
    }

    fn new_reminder(list: &ReminderList, title: &str) -> NewReminder {
        NewReminder {
            list_id: list.id.clone(),
            title: title.to_string(),
            ..NewReminder::default()
        }
    }

    #[test]
    fn test_new_store_has_local_source() {
        let store = setup_store();
        let sources = store.sources().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].title, DEFAULT_SOURCE_TITLE);
    }

    #[test]
    fn test_open_applies_schema_to_empty_file() {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
        let db_path = temp_dir.path().join("reminders.db");
        std::fs::write(&db_path, b"").unwrap_or_else(|e| panic!("{e}"));
        let store = SqliteStore::open(&db_path).unwrap_or_else(|e| panic!("{e}"));
        let sources = store.sources().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(sources.len(), 1);
        assert!(store.lists().map(|l| l.is_empty()).unwrap_or(false));
    }

    #[test]
    fn test_open_creates_parent_and_reopens() {
        let temp_dir = TempDir::new().unwrap_or_else(|e| panic!("{e}"));
        let db_path = temp_dir.path().join("nested").join("reminders.db");
        {
            let mut store = SqliteStore::open(&db_path).unwrap_or_else(|e| panic!("{e}"));
            let source = local(&store);
            store
                .create_list(&source, "Groceries")
                .unwrap_or_else(|e| panic!("{e}"));
        }
        let store = SqliteStore::open(&db_path).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(store.sources().map(|s| s.len()).unwrap_or(0), 1);
        assert_eq!(store.lists().map(|l| l.len()).unwrap_or(0), 1);
    }

    #[test]
    fn test_lists_in_insertion_order_and_writable_only() {
        let mut store = setup_store();
        let source = local(&store);
        let a = store.create_list(&source, "A").unwrap_or_else(|e| panic!("{e}"));
        let b = store.create_list(&source, "B").unwrap_or_else(|e| panic!("{e}"));
        let c = store.create_list(&source, "C").unwrap_or_else(|e| panic!("{e}"));
        store
            .set_list_writable(&b.id, false)
            .unwrap_or_else(|e| panic!("{e}"));

        let lists = store.lists().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(lists, vec![a, c]);
    }

    #[test]
    fn test_create_list_unknown_source() {
        let mut store = setup_store();
        let ghost = Source {
            id: "nope".to_string(),
            title: "Ghost".to_string(),
        };
        assert!(matches!(
            store.create_list(&ghost, "X"),
            Err(crate::error::Error::Storage(StorageError::SourceNotFound { .. }))
        ));
    }

    #[test]
    fn test_reminder_round_trip() {
        let mut store = setup_store();
        let source = local(&store);
        let list = store
            .create_list(&source, "Groceries")
            .unwrap_or_else(|e| panic!("{e}"));
        let due = NaiveDate::from_ymd_opt(2024, 5, 15)
            .and_then(|d| d.and_hms_opt(9, 30, 0))
            .unwrap_or_default();

        let created = store
            .create_reminder(&NewReminder {
                notes: Some("2%".to_string()),
                priority: Priority::High,
                due_date: Some(DueDate::At(due)),
                url: Some("https://example.com".to_string()),
                alarm: Some(due),
                ..new_reminder(&list, "Milk")
            })
            .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(created.title, "Milk");
        assert_eq!(created.list_title, "Groceries");
        assert_eq!(created.priority, Priority::High);
        assert_eq!(created.due_date, Some(DueDate::At(due)));
        assert_eq!(created.alarm, Some(due));
        assert!(!created.completed);

        let fetched = store
            .reminders(std::slice::from_ref(&list))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(fetched, vec![created]);
    }

    #[test]
    fn test_create_reminder_on_missing_list() {
        let mut store = setup_store();
        let list = ReminderList {
            id: "missing".to_string(),
            title: "Missing".to_string(),
            source_id: String::new(),
        };
        assert!(store.create_reminder(&new_reminder(&list, "x")).is_err());
    }

    #[test]
    fn test_update_and_delete_reminder() {
        let mut store = setup_store();
        let source = local(&store);
        let list = store.create_list(&source, "L").unwrap_or_else(|e| panic!("{e}"));
        let mut reminder = store
            .create_reminder(&new_reminder(&list, "Call mom"))
            .unwrap_or_else(|e| panic!("{e}"));

        reminder.completed = true;
        reminder.title = "Call dad".to_string();
        store
            .update_reminder(&reminder)
            .unwrap_or_else(|e| panic!("{e}"));
        let fetched = store
            .reminders(std::slice::from_ref(&list))
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(fetched[0].completed);
        assert_eq!(fetched[0].title, "Call dad");

        store
            .delete_reminder(&reminder)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(store.delete_reminder(&reminder).is_err());
        assert!(
            store
                .reminders(std::slice::from_ref(&list))
                .unwrap_or_else(|e| panic!("{e}"))
                .is_empty()
        );
    }

    #[test]
    fn test_delete_list_cascades() {
        let mut store = setup_store();
        let source = local(&store);
        let list = store.create_list(&source, "L").unwrap_or_else(|e| panic!("{e}"));
        store
            .create_reminder(&new_reminder(&list, "x"))
            .unwrap_or_else(|e| panic!("{e}"));

        store.delete_list(&list).unwrap_or_else(|e| panic!("{e}"));
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM reminders", [], |row| row.get(0))
            .unwrap_or(-1);
        assert_eq!(count, 0);
        assert!(store.update_list(&list).is_err());
    }

    #[test]
    fn test_reminders_across_lists_grouped_by_list() {
        let mut store = setup_store();
        let source = local(&store);
        let a = store.create_list(&source, "A").unwrap_or_else(|e| panic!("{e}"));
        let b = store.create_list(&source, "B").unwrap_or_else(|e| panic!("{e}"));
        for (list, title) in [(&b, "b1"), (&a, "a1"), (&b, "b2"), (&a, "a2")] {
            store
                .create_reminder(&new_reminder(list, title))
                .unwrap_or_else(|e| panic!("{e}"));
        }

        let all = store
            .reminders(&[a.clone(), b.clone()])
            .unwrap_or_else(|e| panic!("{e}"));
        let titles: Vec<_> = all.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["a1", "a2", "b1", "b2"]);
        assert!(store.reminders(&[]).unwrap_or_default().is_empty());
    }

    #[test]
    fn test_move_to_missing_list_is_rejected() {
        let mut store = setup_store();
        let source = local(&store);
        let list = store.create_list(&source, "L").unwrap_or_else(|e| panic!("{e}"));
        let mut reminder = store
            .create_reminder(&new_reminder(&list, "x"))
            .unwrap_or_else(|e| panic!("{e}"));

        reminder.list_id = "gone".to_string();
        assert!(matches!(
            store.update_reminder(&reminder),
            Err(crate::error::Error::Storage(StorageError::Persistence(_)))
        ));
    }
}
