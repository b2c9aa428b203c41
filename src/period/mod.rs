//! Named date-range presets.
//!
//! Maps a preset like `last_quarter` to concrete inclusive start/end
//! instants. Previous-period presets derive their boundaries from the day
//! before the start of the current period, so differing period lengths
//! (28-day February, 90/91/92-day quarters) resolve to exact calendar
//! bounds rather than naive subtraction.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Named range presets.
///
/// Presets travel as snake_case strings. Unrecognized strings decode to
/// [`DatePreset::Unknown`], which resolves like `last_30_days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
    Unknown,
}

impl DatePreset {
    /// Decode a wire string. Anything unrecognized is `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "today" => Self::Today,
            "yesterday" => Self::Yesterday,
            "last_7_days" => Self::Last7Days,
            "last_30_days" => Self::Last30Days,
            "this_month" => Self::ThisMonth,
            "last_month" => Self::LastMonth,
            "this_quarter" => Self::ThisQuarter,
            "last_quarter" => Self::LastQuarter,
            "this_year" => Self::ThisYear,
            "last_year" => Self::LastYear,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7Days => "last_7_days",
            Self::Last30Days => "last_30_days",
            Self::ThisMonth => "this_month",
            Self::LastMonth => "last_month",
            Self::ThisQuarter => "this_quarter",
            Self::LastQuarter => "last_quarter",
            Self::ThisYear => "this_year",
            Self::LastYear => "last_year",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for DatePreset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DatePreset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// An inclusive instant range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Lower bound as a record value (`Z`-suffixed RFC 3339 string).
    pub fn start_value(&self) -> Value {
        Value::String(self.start.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    /// Upper bound as a record value.
    pub fn end_value(&self) -> Value {
        Value::String(self.end.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Resolve a preset against a reference date.
pub fn resolve(preset: DatePreset, today: NaiveDate) -> DateRange {
    match preset {
        DatePreset::Today => span(today, today),
        DatePreset::Yesterday => {
            let day = today - Duration::days(1);
            span(day, day)
        }
        DatePreset::Last7Days => span(today - Duration::days(6), today),
        DatePreset::Last30Days | DatePreset::Unknown => span(today - Duration::days(29), today),
        DatePreset::ThisMonth => span(month_start(today), today),
        DatePreset::LastMonth => {
            let last = month_start(today) - Duration::days(1);
            span(month_start(last), last)
        }
        DatePreset::ThisQuarter => span(quarter_start(today), today),
        DatePreset::LastQuarter => {
            let last = quarter_start(today) - Duration::days(1);
            span(quarter_start(last), last)
        }
        DatePreset::ThisYear => span(year_start(today), today),
        DatePreset::LastYear => {
            let last = year_start(today) - Duration::days(1);
            span(year_start(last), last)
        }
    }
}

/// Resolve a preset against the current UTC date.
pub fn resolve_now(preset: DatePreset) -> DateRange {
    resolve(preset, Utc::now().date_naive())
}

/// Parse a record value as an instant. Accepts RFC 3339 timestamps and
/// plain `YYYY-MM-DD` dates (taken as midnight UTC).
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    let s = value.as_str()?;
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Some(instant.with_timezone(&Utc));
    }
    s.parse::<NaiveDate>()
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn span(start: NaiveDate, end: NaiveDate) -> DateRange {
    DateRange {
        start: start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc(),
        end: end
            .and_hms_opt(23, 59, 59)
            .expect("end of day is a valid time")
            .and_utc(),
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 is valid in every month")
}

fn quarter_start(date: NaiveDate) -> NaiveDate {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).expect("quarter start is a valid date")
}

fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("january 1 is a valid date")
}
