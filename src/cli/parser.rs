//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::core::{Priority, Sort, SortOrder};
use crate::error::CommandError;
use crate::output::OutputFormat;

/// Reminders: manage reminder lists from the command line.
///
/// List, add, edit, complete and delete reminders, printing results as
/// plain text, JSON or s-expressions.
#[derive(Parser, Debug)]
#[command(name = "reminders")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the reminders database file.
    ///
    /// Defaults to `reminders-cli/reminders.db` in the user data directory.
    #[arg(short, long, env = "REMINDERS_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Enable verbose logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format [default: plain, or `REMINDERS_FORMAT`].
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the names and identifiers of all lists.
    ShowLists,

    /// Print reminders from every list.
    #[command(after_help = r#"Examples:
  reminders show-all                          # Incomplete reminders everywhere
  reminders show-all --due-date today         # Due today
  reminders show-all --due-date today --include-overdue
  reminders --format json show-all --include-completed
"#)]
    ShowAll {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print reminders on a list.
    #[command(after_help = r#"Examples:
  reminders show Groceries                    # By list name
  reminders show 0                            # By position from show-lists
  reminders show Work --sort due-date --sort-order descending
  reminders show Work --only-completed
"#)]
    Show {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Add a reminder to a list.
    #[command(after_help = r#"Examples:
  reminders add Groceries Buy milk
  reminders add Work Call Sam --due-date "tomorrow 9am" --priority high
  reminders add Reading Finish chapter --notes "pages 40-80" --url https://example.com
"#)]
    Add {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// Reminder title.
        #[arg(required = true, num_args = 1.., value_parser = NonEmptyStringValueParser::new())]
        text: Vec<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Mark a reminder as completed.
    Complete {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// Reminder title, identifier or position among incomplete reminders.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        item: String,
    },

    /// Mark a reminder as not completed.
    ///
    /// Positions count incomplete reminders only; address a completed
    /// reminder by its title or identifier.
    Uncomplete {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// Reminder title or identifier.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        item: String,
    },

    /// Change fields of a reminder.
    ///
    /// Only the fields given are changed.
    #[command(after_help = r#"Examples:
  reminders edit Groceries 0 Buy oat milk     # New title
  reminders edit Groceries Milk --notes 2%    # Notes only
  reminders edit Work 1 --move-to Personal
"#)]
    Edit {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// Reminder title, identifier or position among incomplete reminders.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        item: String,

        /// New title.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        text: Vec<String>,

        #[command(flatten)]
        fields: FieldArgs,

        /// Move the reminder to this list (name, identifier or position).
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        move_to: Option<String>,
    },

    /// Delete a reminder.
    Delete {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// Reminder title, identifier or position among incomplete reminders.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        item: String,
    },

    /// Create a list.
    #[command(after_help = r#"Examples:
  reminders new-list Errands
  reminders new-list Errands --source iCloud  # When several sources exist
"#)]
    NewList {
        /// Name of the new list.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Source (account) to create the list in.
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        source: Option<String>,
    },

    /// Delete a list and its reminders.
    DeleteList {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,
    },

    /// Rename a list.
    EditList {
        /// List name, identifier or position.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        list: String,

        /// New name.
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        name: String,
    },
}

/// Filtering and ordering flags for `show` and `show-all`.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Show only completed reminders.
    #[arg(long, conflicts_with = "include_completed")]
    pub only_completed: bool,

    /// Show completed reminders alongside incomplete ones.
    #[arg(long)]
    pub include_completed: bool,

    /// Show only reminders due on this day (e.g. `today`, `friday`, `2024-05-20`).
    #[arg(long)]
    pub due_date: Option<String>,

    /// With `--due-date`, also show reminders due earlier.
    #[arg(long, requires = "due_date")]
    pub include_overdue: bool,

    /// Sort key.
    #[arg(long, value_enum, default_value_t = Sort::None)]
    pub sort: Sort,

    /// Sort direction.
    #[arg(long, value_enum, default_value = "ascending")]
    pub sort_order: SortOrder,
}

/// Reminder fields accepted by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Notes attached to the reminder.
    #[arg(short, long)]
    pub notes: Option<String>,

    /// Due date, optionally with a time (e.g. `tomorrow 9am`, `2024-05-20 14:30`).
    #[arg(long)]
    pub due_date: Option<String>,

    /// Priority level.
    #[arg(short, long, value_enum, ignore_case = true)]
    pub priority: Option<Priority>,

    /// URL attached to the reminder.
    #[arg(short, long)]
    pub url: Option<String>,
}

impl Cli {
    /// Resolves the runtime configuration: flags first, then environment
    /// variables, then defaults.
    pub fn config(&self) -> Result<Config, CommandError> {
        let mut builder = Config::builder().verbose(self.verbose);
        if let Some(path) = &self.db_path {
            builder = builder.db_path(path.clone());
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        builder.from_env().build()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_collects_title_words() {
        let cli = parse(&["reminders", "add", "Groceries", "Buy", "milk", "-p", "high"]);
        match cli.command {
            Commands::Add { list, text, fields } => {
                assert_eq!(list, "Groceries");
                assert_eq!(text, ["Buy", "milk"]);
                assert_eq!(fields.priority, Some(Priority::High));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_format_after_subcommand() {
        let cli = parse(&["reminders", "show-lists", "--format", "lisp"]);
        assert_eq!(cli.format, Some(OutputFormat::Lisp));
    }

    #[test]
    fn test_completion_flags_conflict() {
        let err = Cli::try_parse_from([
            "reminders",
            "show",
            "Work",
            "--only-completed",
            "--include-completed",
        ])
        .err()
        .map(|e| e.kind());
        assert_eq!(err, Some(ErrorKind::ArgumentConflict));
    }

    #[test]
    fn test_include_overdue_requires_due_date() {
        let result = Cli::try_parse_from(["reminders", "show-all", "--include-overdue"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(Cli::try_parse_from(["reminders", "show", ""]).is_err());
        assert!(Cli::try_parse_from(["reminders", "complete", "Work", ""]).is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(Cli::try_parse_from(["reminders", "add", "Home", ""]).is_err());
        assert!(Cli::try_parse_from(["reminders", "edit", "Home", "0", ""]).is_err());
    }

    #[test]
    fn test_priority_ignores_case() {
        let cli = parse(&["reminders", "add", "Home", "x", "--priority", "HIGH"]);
        match cli.command {
            Commands::Add { fields, .. } => assert_eq!(fields.priority, Some(Priority::High)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_sort_values() {
        let cli = parse(&[
            "reminders",
            "show",
            "Work",
            "--sort",
            "due-date",
            "--sort-order",
            "descending",
        ]);
        match cli.command {
            Commands::Show { filter, .. } => {
                assert_eq!(filter.sort, Sort::DueDate);
                assert_eq!(filter.sort_order, SortOrder::Descending);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_edit_without_title() {
        let cli = parse(&["reminders", "edit", "Work", "0", "--notes", "later"]);
        match cli.command {
            Commands::Edit { text, fields, .. } => {
                assert!(text.is_empty());
                assert_eq!(fields.notes.as_deref(), Some("later"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_explicit_db_path_wins() {
        let cli = parse(&["reminders", "--db-path", "/custom/path.db", "show-lists"]);
        let config = cli.config().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(config.db_path, PathBuf::from("/custom/path.db"));
    }
}
