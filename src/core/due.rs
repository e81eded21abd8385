//! Due dates and the `--due-date` parser.
//!
//! A due date is either a whole calendar day or a day with a time of day.
//! Only the latter carries an alarm.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::CommandError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static TWELVE_HOUR: Pattern = LazyLock::new(|| {
    Regex::new(r"^(?P<rest>.*?)\s*(?:at\s+)?(?P<h>\d{1,2})(?::(?P<m>\d{2}))?\s*(?P<ampm>am|pm)$")
});
static TWENTY_FOUR_HOUR: Pattern =
    LazyLock::new(|| Regex::new(r"^(?P<rest>.*?)\s*(?:at\s+)?(?P<h>\d{1,2}):(?P<m>\d{2})$"));
static RELATIVE: Pattern =
    LazyLock::new(|| Regex::new(r"^in (?P<n>\d+) (?P<unit>days?|weeks?)$"));

/// When a reminder is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DueDate {
    /// Due some time during this day.
    Day(NaiveDate),
    /// Due at this exact local time.
    At(NaiveDateTime),
}

impl DueDate {
    /// Calendar day the reminder is due on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Day(day) => *day,
            Self::At(at) => at.date(),
        }
    }

    /// Time of day, if the due date has one.
    #[must_use]
    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::Day(_) => None,
            Self::At(at) => Some(at.time()),
        }
    }

    /// Absolute alarm time: present only for timed due dates.
    #[must_use]
    pub const fn alarm(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Day(_) => None,
            Self::At(at) => Some(*at),
        }
    }

    /// Point in time used for ordering. Untimed dates sort at midnight.
    #[must_use]
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            Self::Day(day) => day.and_time(NaiveTime::MIN),
            Self::At(at) => *at,
        }
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{}", day.format(DATE_FORMAT)),
            Self::At(at) => write!(f, "{}", at.format(DATE_TIME_FORMAT)),
        }
    }
}

impl FromStr for DueDate {
    type Err = CommandError;

    /// Parses the ISO forms written by [`Display`](fmt::Display).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(at) = NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT) {
            return Ok(Self::At(at));
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
            return Ok(Self::At(at));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Self::Day)
            .map_err(|_| CommandError::InvalidArgument(format!("invalid date '{s}'")))
    }
}

impl Serialize for DueDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a user-supplied due date relative to `now`.
///
/// Accepted date forms: `today`, `tomorrow`, `yesterday`, `in N days`,
/// `in N weeks`, a weekday name (optionally prefixed with `next`), or
/// `YYYY-MM-DD`. Any of these may be followed by a time, either `HH:MM`
/// or `H[:MM]am|pm`, optionally introduced by `at`. A bare time means today.
///
/// # Errors
///
/// Returns [`CommandError::InvalidArgument`] if the input is not understood.
pub fn parse_due_date(input: &str, now: NaiveDateTime) -> Result<DueDate, CommandError> {
    let invalid = || CommandError::InvalidArgument(format!("could not parse due date '{input}'"));
    if let Ok(due) = input.parse::<DueDate>() {
        return Ok(due);
    }

    let normalized = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if normalized.is_empty() {
        return Err(invalid());
    }

    let (date_part, time) = split_time(&normalized)?;
    let date = parse_day(date_part, now.date()).ok_or_else(invalid)?;

    Ok(time.map_or(DueDate::Day(date), |t| DueDate::At(date.and_time(t))))
}

/// Splits a trailing time off `input`, returning the remaining date text.
fn split_time(input: &str) -> Result<(&str, Option<NaiveTime>), CommandError> {
    let twelve_hour = pattern(&TWELVE_HOUR)?;
    let twenty_four_hour = pattern(&TWENTY_FOUR_HOUR)?;
    let bad_time = || CommandError::InvalidArgument(format!("invalid time in '{input}'"));

    if let Some(caps) = twelve_hour.captures(input) {
        let hour: u32 = caps["h"].parse().map_err(|_| bad_time())?;
        let minute: u32 = caps.name("m").map_or(Ok(0), |m| m.as_str().parse()).map_err(|_| bad_time())?;
        if !(1..=12).contains(&hour) {
            return Err(bad_time());
        }
        let hour = match (&caps["ampm"], hour) {
            ("am", 12) => 0,
            ("am", h) => h,
            ("pm", 12) => 12,
            (_, h) => h + 12,
        };
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad_time)?;
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        return Ok((rest.trim(), Some(time)));
    }

    if let Some(caps) = twenty_four_hour.captures(input) {
        let hour: u32 = caps["h"].parse().map_err(|_| bad_time())?;
        let minute: u32 = caps["m"].parse().map_err(|_| bad_time())?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad_time)?;
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        return Ok((rest.trim(), Some(time)));
    }

    Ok((input, None))
}

fn parse_day(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "" | "today" => return Some(today),
        "tomorrow" => return today.checked_add_signed(Duration::days(1)),
        "yesterday" => return today.checked_sub_signed(Duration::days(1)),
        _ => {}
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, DATE_FORMAT) {
        return Some(date);
    }

    let relative = pattern(&RELATIVE).ok()?;
    if let Some(caps) = relative.captures(input) {
        let n: i64 = caps["n"].parse().ok()?;
        let days = if caps["unit"].starts_with("week") { n.checked_mul(7)? } else { n };
        return today.checked_add_signed(Duration::try_days(days)?);
    }

    let name = input.strip_prefix("next ").unwrap_or(input);
    let weekday = parse_weekday(name)?;
    let ahead = (7 + i64::from(weekday.num_days_from_monday())
        - i64::from(today.weekday().num_days_from_monday()))
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today.checked_add_signed(Duration::days(ahead))
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    match name {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

fn pattern(lock: &'static Pattern) -> Result<&'static Regex, CommandError> {
    lock.as_ref()
        .map_err(|e| CommandError::Unknown(format!("invalid date pattern: {e}")))
}
