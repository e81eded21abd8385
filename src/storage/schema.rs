//! Database schema for the SQLite store.

/// Applied on every open; every statement is idempotent.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS sources (
    id          TEXT PRIMARY KEY,
    title       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS lists (
    id          TEXT PRIMARY KEY,
    source_id   TEXT NOT NULL REFERENCES sources(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    writable    INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS reminders (
    id          TEXT PRIMARY KEY,
    list_id     TEXT NOT NULL REFERENCES lists(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    notes       TEXT,
    completed   INTEGER NOT NULL DEFAULT 0,
    priority    INTEGER NOT NULL DEFAULT 0,
    due_date    TEXT,
    url         TEXT,
    alarm       TEXT,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_lists_source ON lists(source_id);
CREATE INDEX IF NOT EXISTS idx_reminders_list ON reminders(list_id);
";

/// Title of the source seeded into an empty store.
pub const DEFAULT_SOURCE_TITLE: &str = "Local";

/// Timestamp format for `alarm` and `created_at`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
