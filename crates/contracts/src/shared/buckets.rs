//! Группировка записей по временным корзинам для графиков дашборда
//!
//! Rows are first restricted to the rolling window, then folded into buckets:
//! - `last_7_days`: one bucket per calendar day, labelled by weekday ("Mon"),
//!   in order of first occurrence in the input;
//! - `last_1_month`: "Week N" by the row's own month-local week number, ascending;
//! - `last_90_days`, `last_6_months`, `last_year`: "Jan 2024" style month buckets in
//!   chronological order, keeping only the most recent 3 / 6 / all of them.
//!
//! Each bucket sums `value_field` (or counts rows) per distinct `group_field` value.

use super::row::{CellValue, Row};
use super::time_window::{row_instant, TimeWindow};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group key used for rows without a value in `group_field`
pub const UNKNOWN_GROUP: &str = "unknown";

/// What to read from each row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub date_field: String,
    pub group_field: String,
    /// Numeric field to sum; `None` counts rows
    pub value_field: Option<String>,
}

impl BucketSpec {
    pub fn count(date_field: impl Into<String>, group_field: impl Into<String>) -> Self {
        Self {
            date_field: date_field.into(),
            group_field: group_field.into(),
            value_field: None,
        }
    }

    pub fn sum(
        date_field: impl Into<String>,
        group_field: impl Into<String>,
        value_field: impl Into<String>,
    ) -> Self {
        Self {
            date_field: date_field.into(),
            group_field: group_field.into(),
            value_field: Some(value_field.into()),
        }
    }
}

/// Aggregation group keyed by a period label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub label: String,
    pub totals: BTreeMap<String, f64>,
}

impl Bucket {
    fn new(label: String) -> Self {
        Self {
            label,
            totals: BTreeMap::new(),
        }
    }

    /// Aggregate for `group`; a missing group reads as zero
    pub fn value(&self, group: &str) -> f64 {
        self.totals.get(group).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Bucket as a table row: `label`, `total`, any other path is a group aggregate
impl Row for Bucket {
    fn field(&self, path: &str) -> Option<CellValue> {
        let value = match path {
            "label" => CellValue::from(self.label.as_str()),
            "total" => CellValue::from(self.total()),
            group => CellValue::from(self.value(group)),
        };
        Some(value)
    }

    fn row_key(&self) -> Option<String> {
        Some(self.label.clone())
    }
}

/// Distinct group keys across all buckets, sorted
pub fn series_keys(buckets: &[Bucket]) -> Vec<String> {
    let mut keys: Vec<String> = buckets
        .iter()
        .flat_map(|b| b.totals.keys().cloned())
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BucketKey {
    Day(NaiveDate),
    Week(u32),
    Month(i32, u32),
}

impl BucketKey {
    fn for_instant(window: TimeWindow, instant: DateTime<Utc>) -> Self {
        let date = instant.date_naive();
        match window {
            TimeWindow::Last7Days => BucketKey::Day(date),
            TimeWindow::Last1Month => BucketKey::Week(week_of_month(date)),
            TimeWindow::Last90Days | TimeWindow::Last6Months | TimeWindow::LastYear => {
                BucketKey::Month(date.year(), date.month())
            }
        }
    }

    fn label(&self) -> String {
        match self {
            BucketKey::Day(date) => date.format("%a").to_string(),
            BucketKey::Week(n) => format!("Week {}", n),
            BucketKey::Month(year, month) => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%b %Y").to_string())
                .unwrap_or_else(|| format!("{:02} {}", month, year)),
        }
    }
}

/// Month-local week number: `floor((date - first_of_month) / 7 days) + 1`.
///
/// The whole difference is divided by the day length before flooring.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let days = (date - first).num_days().max(0) as u32;
    days / 7 + 1
}

/// Folds `rows` into time buckets for `window`; see the module docs for labelling.
///
/// Every row lands in exactly one bucket, or is dropped when its date does not parse
/// or lies outside the window. Empty input yields no buckets.
pub fn bucket<R: Row>(
    rows: &[R],
    window: TimeWindow,
    spec: &BucketSpec,
    now: DateTime<Utc>,
) -> Vec<Bucket> {
    let mut order: Vec<BucketKey> = Vec::new();
    let mut buckets: BTreeMap<BucketKey, Bucket> = BTreeMap::new();

    for row in rows {
        let Some(instant) = row_instant(row, &spec.date_field) else {
            continue;
        };
        if !window.contains(instant, now) {
            continue;
        }

        let key = BucketKey::for_instant(window, instant);
        let group = row
            .field(&spec.group_field)
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string());
        let amount = match &spec.value_field {
            Some(field) => row.field(field).and_then(|v| v.as_f64()).unwrap_or(0.0),
            None => 1.0,
        };

        let bucket = buckets.entry(key).or_insert_with(|| {
            order.push(key);
            Bucket::new(key.label())
        });
        *bucket.totals.entry(group).or_insert(0.0) += amount;
    }

    let keys: Vec<BucketKey> = match window {
        // Days keep first-occurrence order, everything else is chronological
        TimeWindow::Last7Days => order,
        _ => buckets.keys().copied().collect(),
    };
    let keep = match window {
        TimeWindow::Last90Days => 3,
        TimeWindow::Last6Months => 6,
        _ => keys.len(),
    };
    let skip = keys.len().saturating_sub(keep);

    keys.into_iter()
        .skip(skip)
        .filter_map(|key| buckets.remove(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::{json, Value};

    fn now() -> DateTime<Utc> {
        // Friday
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn appointment(date: &str, status: &str, total: f64) -> Value {
        json!({"created_at": date, "status": status, "total_appointments": total})
    }

    fn spec() -> BucketSpec {
        BucketSpec::sum("created_at", "status", "total_appointments")
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Value> = vec![];
        assert!(bucket(&rows, TimeWindow::Last7Days, &spec(), now()).is_empty());
    }

    #[test]
    fn test_days_follow_first_occurrence() {
        let rows = vec![
            appointment("2024-03-14T10:00:00Z", "completed", 2.0), // Thu
            appointment("2024-03-11T10:00:00Z", "cancelled", 1.0), // Mon
            appointment("2024-03-14T15:00:00Z", "cancelled", 3.0), // Thu again
            appointment("2024-02-01T10:00:00Z", "completed", 9.0), // outside window
        ];
        let buckets = bucket(&rows, TimeWindow::Last7Days, &spec(), now());
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Thu", "Mon"]);
        assert_eq!(buckets[0].value("completed"), 2.0);
        assert_eq!(buckets[0].value("cancelled"), 3.0);
        assert_eq!(buckets[1].value("completed"), 0.0);
    }

    #[test]
    fn test_month_local_weeks() {
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), 1);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()), 1);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 3, 8).unwrap()), 2);
        assert_eq!(week_of_month(NaiveDate::from_ymd_opt(2024, 3, 29).unwrap()), 5);

        let rows = vec![
            appointment("2024-03-10T10:00:00Z", "completed", 1.0), // Week 2
            appointment("2024-02-20T10:00:00Z", "completed", 4.0), // Week 3 of February
            appointment("2024-03-02T10:00:00Z", "completed", 2.0), // Week 1
        ];
        let buckets = bucket(&rows, TimeWindow::Last1Month, &spec(), now());
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3"]);
        assert_eq!(buckets[2].value("completed"), 4.0);
    }

    #[test]
    fn test_ninety_days_keeps_last_three_months() {
        let rows = vec![
            appointment("2023-12-20T10:00:00Z", "completed", 1.0),
            appointment("2024-01-05T10:00:00Z", "completed", 2.0),
            appointment("2024-02-05T10:00:00Z", "pending", 3.0),
            appointment("2024-03-05T10:00:00Z", "completed", 4.0),
        ];
        let buckets = bucket(&rows, TimeWindow::Last90Days, &spec(), now());
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);

        let year = bucket(&rows, TimeWindow::LastYear, &spec(), now());
        assert_eq!(year.len(), 4);
        assert_eq!(year[0].label, "Dec 2023");
    }

    #[test]
    fn test_totals_are_conserved() {
        let rows = vec![
            appointment("2024-03-14T10:00:00Z", "completed", 2.0),
            appointment("2024-03-13T10:00:00Z", "completed", 5.0),
            appointment("2024-03-13T11:00:00Z", "pending", 1.0),
            appointment("invalid", "completed", 100.0),
            json!({"created_at": "2024-03-12T10:00:00Z", "status": "completed"}),
        ];
        let buckets = bucket(&rows, TimeWindow::Last7Days, &spec(), now());
        let completed: f64 = buckets.iter().map(|b| b.value("completed")).sum();
        assert_eq!(completed, 7.0);
        assert_eq!(series_keys(&buckets), vec!["completed", "pending"]);
    }

    #[test]
    fn test_count_mode_and_unknown_group() {
        let rows = vec![
            json!({"created_at": "2024-03-14T10:00:00Z"}),
            json!({"created_at": "2024-03-14T11:00:00Z", "status": "completed"}),
        ];
        let buckets = bucket(
            &rows,
            TimeWindow::Last7Days,
            &BucketSpec::count("created_at", "status"),
            now(),
        );
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].value(UNKNOWN_GROUP), 1.0);
        assert_eq!(buckets[0].total(), 2.0);
    }

    #[test]
    fn test_bucket_as_row() {
        let mut bucket = Bucket::new("Week 2".to_string());
        bucket.totals.insert("completed".to_string(), 3.0);
        bucket.totals.insert("pending".to_string(), 1.0);
        assert_eq!(bucket.field("label"), Some(CellValue::from("Week 2")));
        assert_eq!(bucket.field("total"), Some(CellValue::from(4.0)));
        assert_eq!(bucket.field("cancelled"), Some(CellValue::from(0.0)));
    }
}
