//! Глобальный нечеткий фильтр таблицы
//!
//! A row matches when the query is a case-insensitive substring of any column's
//! display string. `"activ"` therefore matches both "Active" and "Inactive".

use super::column::ColumnDef;
use super::row::Row;

/// True when any column of `row` contains `query` (case-insensitive).
/// An empty or whitespace-only query matches every row.
pub fn matches<R: Row + ?Sized>(row: &R, columns: &[ColumnDef], query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    columns
        .iter()
        .any(|column| contains_lowercase(row, &column.accessor, &needle))
}

/// Same test restricted to a single column (used by per-column filters)
pub fn matches_column<R: Row + ?Sized>(row: &R, column: &ColumnDef, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    contains_lowercase(row, &column.accessor, &query.to_lowercase())
}

fn contains_lowercase<R: Row + ?Sized>(row: &R, accessor: &str, needle: &str) -> bool {
    row.field(accessor)
        .map(|value| value.to_string().to_lowercase().contains(needle))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<ColumnDef> {
        vec![ColumnDef::new("name", "Name"), ColumnDef::new("status", "Status")]
    }

    #[test]
    fn test_substring_matches_both_statuses() {
        let alice = json!({"name": "Alice", "status": "Active"});
        let bob = json!({"name": "Bob", "status": "Inactive"});
        assert!(matches(&alice, &columns(), "activ"));
        assert!(matches(&bob, &columns(), "activ"));
        assert!(matches(&bob, &columns(), "BOB"));
        assert!(!matches(&alice, &columns(), "bob"));
    }

    #[test]
    fn test_empty_query_is_inert() {
        let row = json!({"name": null});
        assert!(matches(&row, &columns(), ""));
        assert!(matches(&row, &columns(), "   "));
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_query() {
        let row = json!({"name": "Alice", "status": "Active member"});
        assert!(!matches(&row, &columns(), "alice "));
        assert!(matches(&row, &columns(), "active "));
        assert!(!matches_column(&row, &ColumnDef::new("name", "Name"), " alice"));
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let row = json!({"name": "Order", "status": 1250, "paid": true});
        let mut cols = columns();
        cols.push(ColumnDef::new("paid", "Paid"));
        assert!(matches(&row, &cols, "125"));
        assert!(matches(&row, &cols, "true"));
    }

    #[test]
    fn test_missing_accessor_never_matches_or_panics() {
        let row = json!({"other": "value"});
        assert!(!matches(&row, &columns(), "value"));
        assert!(matches_column(&row, &ColumnDef::new("name", "Name"), ""));
        assert!(!matches_column(&row, &ColumnDef::new("name", "Name"), "x"));
    }
}
