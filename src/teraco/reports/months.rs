//! Month-year label arithmetic for reporting periods.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::teraco::reports::error::{Result, ReportError};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Largest serial Excel accepts as a date (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// A calendar month within a year, e.g. `Feb-25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportingMonth {
    month: u32,
    year: i32,
}

impl ReportingMonth {
    /// Creates a reporting month, rejecting months outside `1..=12`.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { month, year })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The following month; December rolls over into January.
    pub fn next(&self) -> Self {
        let (month, year) = next_month(self.month, self.year);
        Self { month, year }
    }

    /// The `Mmm-YY` label, e.g. `Mar-25`.
    pub fn label(&self) -> String {
        format_month_year(self.month, self.year)
    }
}

impl fmt::Display for ReportingMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for ReportingMonth {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let (month, year) = parse_month_year(s)?;
        Ok(Self { month, year })
    }
}

/// Parses labels such as `Feb-25`, `february_2025`, or `MAR-25` into
/// `(month, year)`. Two-digit years are taken as 20xx.
pub fn parse_month_year(label: &str) -> Result<(u32, i32)> {
    let invalid = |reason: &str| ReportError::InvalidMonth {
        label: label.to_string(),
        reason: reason.to_string(),
    };

    let parts: Vec<&str> = label.trim().split(['-', '_']).collect();
    let [month_token, year_token] = parts.as_slice() else {
        return Err(invalid("expected <month>-<year>"));
    };

    let month = parse_month_name(month_token.trim()).ok_or_else(|| invalid("invalid month"))?;

    let year_token = year_token.trim();
    if !year_token.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(invalid("invalid year"));
    }
    let year = match year_token.len() {
        2 => 2000 + year_token.parse::<i32>().map_err(|_| invalid("invalid year"))?,
        4 => year_token.parse::<i32>().map_err(|_| invalid("invalid year"))?,
        _ => return Err(invalid("invalid year")),
    };

    Ok((month, year))
}

fn parse_month_name(token: &str) -> Option<u32> {
    let lowered = token.to_lowercase();
    MONTH_NAMES
        .iter()
        .position(|name| *name == lowered || (lowered.len() == 3 && name.starts_with(&lowered)))
        .map(|index| index as u32 + 1)
}

/// Returns the month after `(month, year)`.
pub fn next_month(month: u32, year: i32) -> (u32, i32) {
    if month == 12 {
        (1, year + 1)
    } else {
        (month + 1, year)
    }
}

/// Renders `(month, year)` as a three-letter month and two-digit year.
pub fn format_month_year(month: u32, year: i32) -> String {
    let abbreviation = MONTH_ABBREVIATIONS[(month.clamp(1, 12) - 1) as usize];
    format!("{abbreviation}-{:02}", year.rem_euclid(100))
}

/// Converts an Excel date serial (1900 system) into a reporting month.
pub fn month_from_excel_serial(serial: f64) -> Option<ReportingMonth> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(Duration::days(serial.floor() as i64))?;
    ReportingMonth::new(date.month(), date.year())
}
