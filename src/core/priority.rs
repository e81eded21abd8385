//! Reminder priority levels.

use serde::Serialize;

/// Priority of a reminder, ordered from lowest to highest.
///
/// The host store keeps priority as an integer in `0..=9` where `0` means
/// unset and smaller non-zero values are more urgent (`1` high, `5` medium,
/// `9` low). [`from_store_value`](Priority::from_store_value) buckets any
/// value in that range back into one of the four levels.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// No priority set.
    #[default]
    None,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::None, Self::Low, Self::Medium, Self::High];

    /// Integer representation used by the store.
    #[must_use]
    pub const fn store_value(self) -> i64 {
        match self {
            Self::None => 0,
            Self::High => 1,
            Self::Medium => 5,
            Self::Low => 9,
        }
    }

    /// Maps a store integer back to a level. Out-of-range values are `None`.
    #[must_use]
    pub const fn from_store_value(value: i64) -> Self {
        match value {
            1..=4 => Self::High,
            5 => Self::Medium,
            6..=9 => Self::Low,
            _ => Self::None,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
