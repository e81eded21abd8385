//! Output encodings.
//!
//! Results are rendered once per invocation in one of three formats:
//! structured JSON ([`json`]), flat s-expressions ([`lisp`]) or
//! human-readable lines ([`plain`]). Callers describe what they are
//! printing with a [`View`]; the chosen [`Renderer`] turns it into text.

pub mod json;
pub mod lisp;
pub mod plain;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;

use crate::core::{Reminder, ReminderList};
use crate::error::{CommandError, OutputError};

use plain::PlainEncoder;

/// Output format, chosen once per invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Plain,
    /// Pretty-printed JSON with sorted keys.
    Json,
    /// Flat s-expressions.
    Lisp,
}

impl FromStr for OutputFormat {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "lisp" | "sexp" => Ok(Self::Lisp),
            other => Err(CommandError::InvalidArgument(format!(
                "unknown output format '{other}' (expected plain, json or lisp)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
            Self::Lisp => "lisp",
        })
    }
}

/// What is being printed.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// A single list.
    List(&'a ReminderList),
    /// Lists in display order.
    Lists(&'a [ReminderList]),
    /// A single reminder.
    Reminder(&'a Reminder),
    /// Reminders in display order.
    Reminders {
        /// The reminders.
        items: &'a [Reminder],
        /// Annotate each reminder with its list (plain format only).
        show_list: bool,
    },
}

impl View<'_> {
    fn to_value(self) -> Result<Value, OutputError> {
        let value = match self {
            Self::List(list) => serde_json::to_value(list)?,
            Self::Lists(lists) => serde_json::to_value(lists)?,
            Self::Reminder(reminder) => serde_json::to_value(reminder)?,
            Self::Reminders { items, .. } => serde_json::to_value(items)?,
        };
        Ok(value)
    }
}

/// Renders views in a fixed format.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    plain: PlainEncoder,
}

impl Renderer {
    /// Creates a renderer. `today` anchors relative dates in plain output.
    #[must_use]
    pub const fn new(format: OutputFormat, today: NaiveDate) -> Self {
        Self {
            format,
            plain: PlainEncoder::new(today),
        }
    }

    /// The configured format.
    #[must_use]
    pub const fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders `view`.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization fails.
    pub fn render(&self, view: View<'_>) -> Result<String, OutputError> {
        self.render_labeled(view, None)
    }

    /// Renders `view`, prefixing single-item plain output with `label`
    /// (e.g. `"Added: "`). Other formats ignore the label.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if serialization fails.
    pub fn render_labeled(&self, view: View<'_>, label: Option<&str>) -> Result<String, OutputError> {
        match self.format {
            OutputFormat::Plain => Ok(self.plain.encode_labeled(view, label)),
            OutputFormat::Json => json::encode(&view.to_value()?),
            OutputFormat::Lisp => lisp::encode(&view.to_value()?),
        }
    }
}
