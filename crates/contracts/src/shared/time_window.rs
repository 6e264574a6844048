//! Relative time windows ("last 7 days", "last year"...) and the client-side filter

use super::row::{CellValue, Row};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named relative range, resolved to `[start, now]` at evaluation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_1_month")]
    Last1Month,
    #[serde(rename = "last_90_days")]
    Last90Days,
    #[serde(rename = "last_6_months")]
    Last6Months,
    LastYear,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Last7Days => "last_7_days",
            TimeWindow::Last1Month => "last_1_month",
            TimeWindow::Last90Days => "last_90_days",
            TimeWindow::Last6Months => "last_6_months",
            TimeWindow::LastYear => "last_year",
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            TimeWindow::Last7Days => "Last 7 days",
            TimeWindow::Last1Month => "Last month",
            TimeWindow::Last90Days => "Last 90 days",
            TimeWindow::Last6Months => "Last 6 months",
            TimeWindow::LastYear => "Last year",
        }
    }

    pub fn all() -> &'static [TimeWindow] {
        &[
            TimeWindow::Last7Days,
            TimeWindow::Last1Month,
            TimeWindow::Last90Days,
            TimeWindow::Last6Months,
            TimeWindow::LastYear,
        ]
    }

    /// Closed interval `[start, now]` covered by the window.
    ///
    /// Month based windows use calendar arithmetic (the day of month is clamped,
    /// e.g. 31 March minus one month is 28/29 February).
    pub fn range(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            TimeWindow::Last7Days => now - Duration::days(7),
            TimeWindow::Last1Month => sub_months_or_days(now, 1, 30),
            TimeWindow::Last90Days => now - Duration::days(90),
            TimeWindow::Last6Months => sub_months_or_days(now, 6, 182),
            TimeWindow::LastYear => sub_months_or_days(now, 12, 365),
        };
        (start, now)
    }

    pub fn contains(&self, instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let (start, end) = self.range(now);
        instant >= start && instant <= end
    }
}

fn sub_months_or_days(now: DateTime<Utc>, months: u32, fallback_days: i64) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .unwrap_or_else(|| now - Duration::days(fallback_days))
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeWindow::all()
            .iter()
            .copied()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| format!("Unknown time window: {}", s))
    }
}

/// Parses a cell into an instant.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS[.f]` (UTC assumed),
/// `YYYY-MM-DD` (midnight UTC) and numbers as epoch milliseconds.
pub fn parse_instant(value: &CellValue) -> Option<DateTime<Utc>> {
    match value {
        CellValue::Number(ms) if ms.is_finite() => DateTime::from_timestamp_millis(*ms as i64),
        CellValue::Text(s) => parse_instant_str(s),
        _ => None,
    }
}

pub fn parse_instant_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Instant stored in `date_field` of `row`, if it parses
pub fn row_instant<R: Row + ?Sized>(row: &R, date_field: &str) -> Option<DateTime<Utc>> {
    row.field(date_field).as_ref().and_then(parse_instant)
}

/// Keeps rows whose `date_field` falls inside the named window.
///
/// `None` or an unrecognised window name returns every row unchanged. Rows whose
/// date does not parse are excluded.
pub fn filter_by_window<'a, R: Row>(
    rows: &'a [R],
    date_field: &str,
    window_name: Option<&str>,
    now: DateTime<Utc>,
) -> Vec<&'a R> {
    let window = match window_name.and_then(|name| name.parse::<TimeWindow>().ok()) {
        Some(window) => window,
        None => return rows.iter().collect(),
    };
    rows.iter()
        .filter(|row| {
            row_instant(*row, date_field)
                .map(|instant| window.contains(instant, now))
                .unwrap_or(false)
        })
        .collect()
}
