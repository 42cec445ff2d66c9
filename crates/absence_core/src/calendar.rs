//! Calendar-day identity and clock abstraction.
//!
//! # Responsibility
//! - Normalize points in time into a calendar day (year, month, day-of-month).
//! - Provide a swappable source of "now" for services and tests.
//!
//! # Invariants
//! - Two values are the same day iff year, month and day-of-month match.
//! - Month indexes exposed by `month0()` are zero-based (`0..=11`).
//! - The local calendar is canonical for "now", stored date-times, lookup
//!   and statistics alike.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar parsing/construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Year/month/day triple does not name a real date.
    OutOfRange { year: i32, month: u32, day: u32 },
    /// Text is neither `YYYY-MM-DD` nor an RFC 3339 date-time.
    Unparseable(String),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { year, month, day } => {
                write!(f, "no such calendar day: {year:04}-{month:02}-{day:02}")
            }
            Self::Unparseable(value) => write!(f, "unparseable calendar day `{value}`"),
        }
    }
}

impl Error for CalendarError {}

/// Calendar-day identity with no time-of-day component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(NaiveDate);

impl CalendarDay {
    /// Builds a day from a 1-based month, as written in ISO dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(CalendarError::OutOfRange { year, month, day })
    }

    /// Projects a point in time onto the calendar of its own time zone.
    pub fn from_datetime<Tz: TimeZone>(value: &DateTime<Tz>) -> Self {
        Self(value.date_naive())
    }

    /// Parses `YYYY-MM-DD` or a full RFC 3339 date-time.
    ///
    /// Date-times are moved into the local calendar first, so a UTC instant
    /// written for local midnight lands on the day it was recorded for.
    pub fn parse(value: &str) -> Result<Self, CalendarError> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT) {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|parsed| Self::from_datetime(&parsed.with_timezone(&Local)))
            .map_err(|_| CalendarError::Unparseable(trimmed.to_string()))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Zero-based month index (`0` = January).
    pub fn month0(&self) -> u32 {
        self.0.month0()
    }

    /// Day of month, starting at 1.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn to_iso_string(&self) -> String {
        self.0.format(ISO_DATE_FORMAT).to_string()
    }
}

impl FromStr for CalendarDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for CalendarDay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(ISO_DATE_FORMAT))
    }
}

/// Source of the current point in time.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Calendar day of `now()` in the local calendar.
    fn today(&self) -> CalendarDay {
        CalendarDay::from_datetime(&self.now())
    }

    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// Wall-clock backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Local>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Local>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.instant
    }
}
