//! Filtering and ordering of reminder candidates.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;

use super::reminder::Reminder;

/// Which reminders to show based on completion state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOptions {
    /// Every reminder.
    All,
    /// Only reminders that are not completed.
    #[default]
    Incomplete,
    /// Only completed reminders.
    Complete,
}

impl DisplayOptions {
    /// Builds the option from the CLI's two mutually exclusive flags.
    #[must_use]
    pub const fn from_flags(only_completed: bool, include_completed: bool) -> Self {
        if only_completed {
            Self::Complete
        } else if include_completed {
            Self::All
        } else {
            Self::Incomplete
        }
    }

    /// Returns `true` if `reminder` passes this filter.
    #[must_use]
    pub const fn matches(self, reminder: &Reminder) -> bool {
        match self {
            Self::All => true,
            Self::Incomplete => !reminder.completed,
            Self::Complete => reminder.completed,
        }
    }
}

/// Due-date filter at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueFilter {
    /// Target day.
    pub date: NaiveDate,
    /// Also match reminders due strictly before `date`.
    pub include_overdue: bool,
}

impl DueFilter {
    /// Returns `true` if `reminder` is due on the target day, or earlier when
    /// overdue reminders are included. Undated reminders never match.
    #[must_use]
    pub fn matches(&self, reminder: &Reminder) -> bool {
        let Some(due) = reminder.due_date else {
            return false;
        };
        match due.date().cmp(&self.date) {
            Ordering::Equal => true,
            Ordering::Less => self.include_overdue,
            Ordering::Greater => false,
        }
    }
}

/// Sort key for reminder listings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Sort {
    /// Store order.
    #[default]
    None,
    /// By due date; undated reminders last.
    DueDate,
    /// By title, case-insensitive.
    Title,
    /// By creation time.
    CreationDate,
}

impl Sort {
    fn compare(self, a: &Reminder, b: &Reminder) -> Ordering {
        match self {
            Self::None => Ordering::Equal,
            Self::DueDate => match (&a.due_date, &b.due_date) {
                (Some(x), Some(y)) => x.sort_key().cmp(&y.sort_key()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            Self::CreationDate => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::DueDate => "due-date",
            Self::Title => "title",
            Self::CreationDate => "creation-date",
        })
    }
}

/// Direction of a [`Sort`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Everything that narrows or orders a reminder listing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ItemFilter {
    /// Completion filter.
    pub display: DisplayOptions,
    /// Optional due-date filter.
    pub due: Option<DueFilter>,
    /// Sort key.
    pub sort: Sort,
    /// Sort direction.
    pub order: SortOrder,
}

impl ItemFilter {
    /// Filter with only a completion setting.
    #[must_use]
    pub fn display(display: DisplayOptions) -> Self {
        Self {
            display,
            ..Self::default()
        }
    }

    /// Applies completion filter, then due-date filter, then the stable sort.
    #[must_use]
    pub fn apply(&self, reminders: Vec<Reminder>) -> Vec<Reminder> {
        let mut kept: Vec<Reminder> = reminders
            .into_iter()
            .filter(|r| self.display.matches(r))
            .filter(|r| self.due.is_none_or(|due| due.matches(r)))
            .collect();

        if self.sort != Sort::None {
            let sort = self.sort;
            match self.order {
                SortOrder::Ascending => kept.sort_by(|a, b| sort.compare(a, b)),
                SortOrder::Descending => kept.sort_by(|a, b| sort.compare(b, a)),
            }
        }
        kept
    }
}
