//! Error types for reminders-cli.
//!
//! Library code returns [`Result`], whose [`Error`] wraps one of three
//! domain-specific enums: store failures ([`StorageError`]), command-level
//! failures such as an unresolvable query ([`CommandError`]), and encoding
//! failures ([`OutputError`]).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The reminders store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A command could not be carried out.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Output could not be encoded.
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl Error {
    /// Returns `true` when the error only says that a reminder query matched
    /// nothing. Callers may treat this as non-fatal (e.g. `delete`).
    #[must_use]
    pub const fn is_reminder_not_found(&self) -> bool {
        matches!(self, Self::Command(CommandError::ReminderNotFound { .. }))
    }
}

/// Failures reported by a [`ReminderStore`](crate::storage::ReminderStore).
///
/// These propagate unchanged from the store to the CLI boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A list referenced by identifier does not exist.
    #[error("list not found in store: {id}")]
    ListNotFound {
        /// The list identifier.
        id: String,
    },

    /// A reminder referenced by identifier does not exist.
    #[error("reminder not found in store: {id}")]
    ReminderNotFound {
        /// The reminder identifier.
        id: String,
    },

    /// A source referenced by identifier does not exist.
    #[error("source not found in store: {id}")]
    SourceNotFound {
        /// The source identifier.
        id: String,
    },

    /// The store rejected a change.
    #[error("failed to persist changes: {0}")]
    Persistence(String),

    /// A value read back from the store could not be interpreted.
    #[error("corrupt store value: {0}")]
    Corrupt(String),

    /// Filesystem error while opening the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by the command layer.
#[derive(Debug, Error)]
pub enum CommandError {
    /// No usable source for a new list (missing or ambiguous).
    #[error("list source error: {0}")]
    ListSource(String),

    /// No list matched the query.
    #[error("no list matching '{query}'")]
    ListNotFound {
        /// The user-supplied list query.
        query: String,
    },

    /// No reminder matched the query within the named list.
    #[error("no reminder matching '{query}' on list '{list}'")]
    ReminderNotFound {
        /// The user-supplied reminder query.
        query: String,
        /// Title of the list that was searched.
        list: String,
    },

    /// An index outside the candidate range.
    #[error("index {index} is out of range (0..{len})")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of candidates.
        len: usize,
    },

    /// A user-supplied argument could not be used.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Catch-all.
    #[error("{0}")]
    Unknown(String),
}

/// Failures while encoding output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The symbolic encoder only supports flat records.
    #[error("cannot encode nested value for key '{key}' as an s-expression")]
    NestedValue {
        /// Record key holding the nested value.
        key: String,
    },

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
