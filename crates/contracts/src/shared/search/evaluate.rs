//! Local evaluation of search criteria against in-memory rows
//!
//! The backend search endpoint and the client-side fallback use the same rules, so a
//! criterion behaves identically whether it runs locally or remotely.

use super::criterion::{SearchCriterion, SearchOperator, SearchValue};
use crate::shared::row::{CellValue, Row};
use crate::shared::time_window::parse_instant;
use std::cmp::Ordering;

impl SearchCriterion {
    /// True when `row` satisfies this criterion.
    ///
    /// A field that does not resolve (or is null) never matches.
    pub fn matches<R: Row + ?Sized>(&self, row: &R) -> bool {
        let Some(cell) = row.field(&self.field).filter(|v| !v.is_null()) else {
            return false;
        };
        match (self.operator, &self.value) {
            (SearchOperator::Eq, SearchValue::Scalar(v)) => values_equal(&cell, v),
            (SearchOperator::Neq, SearchValue::Scalar(v)) => !values_equal(&cell, v),
            (SearchOperator::Ilike, SearchValue::Scalar(v)) => {
                let needle = strip_wildcards(&v.to_string()).to_lowercase();
                cell.to_string().to_lowercase().contains(&needle)
            }
            (SearchOperator::Like, SearchValue::Scalar(v)) => {
                cell.to_string().contains(&strip_wildcards(&v.to_string()))
            }
            (SearchOperator::Gt, SearchValue::Scalar(v)) => {
                compare_values(&cell, v) == Some(Ordering::Greater)
            }
            (SearchOperator::Gte, SearchValue::Scalar(v)) => matches!(
                compare_values(&cell, v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            (SearchOperator::Lt, SearchValue::Scalar(v)) => {
                compare_values(&cell, v) == Some(Ordering::Less)
            }
            (SearchOperator::Lte, SearchValue::Scalar(v)) => matches!(
                compare_values(&cell, v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            (SearchOperator::Between, SearchValue::List(bounds)) if bounds.len() == 2 => {
                let after_start = matches!(
                    compare_values(&cell, &bounds[0]),
                    Some(Ordering::Greater | Ordering::Equal)
                );
                let before_end = matches!(
                    compare_values(&cell, &bounds[1]),
                    Some(Ordering::Less | Ordering::Equal)
                );
                after_start && before_end
            }
            (SearchOperator::In, SearchValue::List(members)) => {
                members.iter().any(|m| values_equal(&cell, m))
            }
            // Malformed shape (rejected by validate); never matches
            _ => false,
        }
    }
}

/// Rows matching every criterion (AND semantics); no criteria keeps all rows
pub fn filter_rows<'a, R: Row>(rows: &'a [R], criteria: &[SearchCriterion]) -> Vec<&'a R> {
    rows.iter()
        .filter(|row| criteria.iter().all(|c| c.matches(*row)))
        .collect()
}

/// Owned variant of [`filter_rows`]
pub fn filter_rows_cloned<R: Row + Clone>(rows: &[R], criteria: &[SearchCriterion]) -> Vec<R> {
    filter_rows(rows, criteria).into_iter().cloned().collect()
}

fn strip_wildcards(pattern: &str) -> String {
    pattern.trim().trim_matches('%').to_string()
}

fn values_equal(cell: &CellValue, expected: &CellValue) -> bool {
    match (cell.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => cell.to_string() == expected.to_string(),
    }
}

/// Numbers compare numerically, then dates chronologically, then text case-insensitively
fn compare_values(cell: &CellValue, expected: &CellValue) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (cell.as_f64(), expected.as_f64()) {
        return a.partial_cmp(&b);
    }
    if let (Some(a), Some(b)) = (parse_instant(cell), parse_instant(expected)) {
        return Some(a.cmp(&b));
    }
    Some(
        cell.to_string()
            .to_lowercase()
            .cmp(&expected.to_string().to_lowercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn orders() -> Vec<Value> {
        vec![
            json!({"id": "o1", "status": "completed", "total": 120.0,
                   "created_at": "2024-03-01T10:00:00Z", "client": {"name": "Amina Hassan"}}),
            json!({"id": "o2", "status": "pending", "total": 40,
                   "created_at": "2024-03-10T10:00:00Z", "client": {"name": "Baraka Otieno"}}),
            json!({"id": "o3", "status": "cancelled", "total": "75.5",
                   "created_at": "2024-02-20T10:00:00Z", "client": null}),
        ]
    }

    fn ids(rows: Vec<&Value>) -> Vec<String> {
        rows.into_iter().filter_map(|r| r.row_key()).collect()
    }

    #[test]
    fn test_ilike_on_nested_path() {
        let rows = orders();
        let criteria = vec![SearchCriterion::new("client.name", SearchOperator::Ilike, "%HASS%")];
        assert_eq!(ids(filter_rows(&rows, &criteria)), vec!["o1"]);
        let like = vec![SearchCriterion::new("client.name", SearchOperator::Like, "hass")];
        assert!(filter_rows(&rows, &like).is_empty());
    }

    #[test]
    fn test_numeric_comparisons_coerce_text() {
        let rows = orders();
        let gte = vec![SearchCriterion::new("total", SearchOperator::Gte, 75.5)];
        assert_eq!(ids(filter_rows(&rows, &gte)), vec!["o1", "o3"]);
        let eq = vec![SearchCriterion::new("total", SearchOperator::Eq, "40")];
        assert_eq!(ids(filter_rows(&rows, &eq)), vec!["o2"]);
    }

    #[test]
    fn test_between_dates_is_closed() {
        let rows = orders();
        let criteria = vec![SearchCriterion::new(
            "created_at",
            SearchOperator::Between,
            SearchValue::range("2024-03-01T10:00:00Z", "2024-03-10"),
        )];
        assert_eq!(ids(filter_rows(&rows, &criteria)), vec!["o1"]);
    }

    #[test]
    fn test_in_neq_and_and_semantics() {
        let rows = orders();
        let criteria = vec![
            SearchCriterion::new(
                "status",
                SearchOperator::In,
                SearchValue::List(vec!["pending".into(), "cancelled".into()]),
            ),
            SearchCriterion::new("id", SearchOperator::Neq, "o3"),
        ];
        assert_eq!(ids(filter_rows(&rows, &criteria)), vec!["o2"]);
        assert_eq!(filter_rows(&rows, &[]).len(), 3);
    }

    #[test]
    fn test_missing_field_never_matches() {
        let rows = orders();
        let criteria = vec![SearchCriterion::new("client.name", SearchOperator::Neq, "x")];
        assert_eq!(ids(filter_rows(&rows, &criteria)), vec!["o1", "o2"]);
    }
}
