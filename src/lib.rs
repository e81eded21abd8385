//! # reminders-cli
//!
//! Command-line front end for a personal reminders store.
//!
//! Reminders live in lists, and lists belong to sources (accounts). The
//! crate resolves user queries (position, identifier or name) against the
//! store, applies filters and field-level edits, and renders results as
//! plain text, JSON or s-expressions.
//!
//! ## Layout
//!
//! - [`core`]: domain types, query resolution, filtering and due-date parsing
//! - [`storage`]: the [`storage::ReminderStore`] trait and its `SQLite` backend
//! - [`service`]: the command layer tying resolution to store mutations
//! - [`output`]: the three output encodings
//! - [`cli`]: argument parsing and command dispatch
//! - [`config`]: runtime configuration from flags and environment
//!
//! ## Example
//!
//! ```no_run
//! use reminders_cli::core::ItemFilter;
//! use reminders_cli::service::ReminderService;
//! use reminders_cli::storage::SqliteStore;
//!
//! # fn main() -> reminders_cli::Result<()> {
//! let store = SqliteStore::open(std::path::Path::new("reminders.db"))?;
//! let service = ReminderService::new(store);
//! let (list, items) = service.show("Groceries", &ItemFilter::default())?;
//! println!("{}: {} open", list.title, items.len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod output;
pub mod service;
pub mod storage;

pub use error::{CommandError, Error, OutputError, Result, StorageError};
