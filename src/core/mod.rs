//! Core domain types: lists, reminders, priorities, due dates, filtering
//! and query resolution.
//!
//! Nothing in here talks to the store or formats output.

pub mod due;
pub mod filter;
pub mod list;
pub mod priority;
pub mod reminder;
pub mod resolver;

pub use due::{DueDate, parse_due_date};
pub use filter::{DisplayOptions, DueFilter, ItemFilter, Sort, SortOrder};
pub use list::{ReminderList, Source};
pub use priority::Priority;
pub use reminder::{NewReminder, Reminder, ReminderPatch};
pub use resolver::{Resolvable, resolve, resolve_by_key};
