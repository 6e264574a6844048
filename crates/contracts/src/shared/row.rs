//! Row access by field path
//!
//! Every list in the admin panel (orders, professionals, booths...) is rendered by the
//! same table engine. The engine only knows how to ask a row for a value by a string
//! key, so each row type implements [`Row`]. Resolution never panics: a missing or
//! mistyped path yields `None` and the caller renders a placeholder instead.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Placeholder rendered for cells whose accessor does not resolve
pub const EMPTY_CELL: &str = "-";

/// Scalar cell value resolved from a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view of the value (numbers as is, numeric strings parsed)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Converts a JSON scalar. Objects and arrays have no scalar form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(CellValue::Null),
            serde_json::Value::Bool(b) => Some(CellValue::Bool(*b)),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number),
            serde_json::Value::String(s) => Some(CellValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Ordering used by table sorting.
    ///
    /// A total order: booleans first, then numbers (numeric text included) compared
    /// numerically, then other text case-insensitively, nulls last.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(&b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(&b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn sort_key(&self) -> SortKey {
        match self {
            CellValue::Null => SortKey::Null,
            CellValue::Bool(b) => SortKey::Bool(*b),
            CellValue::Number(n) => SortKey::Number(*n),
            CellValue::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => SortKey::Number(n),
                Err(_) => SortKey::Text(s.to_lowercase()),
            },
        }
    }
}

/// Sort key derived from a single value, so the comparison stays transitive
enum SortKey {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Bool(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Null => 3,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

/// Trait для строк таблицы, поля которых доступны по строковому ключу
pub trait Row {
    /// Resolves a field by key or dot-path (`"user.name"`)
    fn field(&self, path: &str) -> Option<CellValue>;

    /// Stable identity used for row selection
    fn row_key(&self) -> Option<String> {
        self.field("id")
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
    }
}

impl<T: Row + ?Sized> Row for &T {
    fn field(&self, path: &str) -> Option<CellValue> {
        (**self).field(path)
    }

    fn row_key(&self) -> Option<String> {
        (**self).row_key()
    }
}

impl Row for serde_json::Value {
    fn field(&self, path: &str) -> Option<CellValue> {
        resolve_json_path(self, path).and_then(CellValue::from_json)
    }
}

/// Walks a dot-path through nested objects; numeric segments index arrays
pub fn resolve_json_path<'a>(
    value: &'a serde_json::Value,
    path: &str,
) -> Option<&'a serde_json::Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(value, |current, segment| match current {
        serde_json::Value::Object(map) => map.get(segment),
        serde_json::Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// Display string of a field, or `placeholder` when absent or null
pub fn display_or<R: Row + ?Sized>(row: &R, path: &str, placeholder: &str) -> String {
    match row.field(path) {
        Some(CellValue::Null) | None => placeholder.to_string(),
        Some(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dot_path_resolution() {
        let row = json!({"id": 7, "user": {"name": "Amina", "tags": ["vip", "new"]}});
        assert_eq!(row.field("user.name"), Some(CellValue::from("Amina")));
        assert_eq!(row.field("user.tags.1"), Some(CellValue::from("new")));
        assert_eq!(row.field("user.missing"), None);
        assert_eq!(row.field("user"), None);
        assert_eq!(row.field(""), None);
        assert_eq!(row.row_key().as_deref(), Some("7"));
    }

    #[test]
    fn test_display_or_placeholder() {
        let row = json!({"phone": null, "name": "Zawadi"});
        assert_eq!(display_or(&row, "phone", EMPTY_CELL), "-");
        assert_eq!(display_or(&row, "email", "N/A"), "N/A");
        assert_eq!(display_or(&row, "name", EMPTY_CELL), "Zawadi");
    }

    #[test]
    fn test_number_display() {
        assert_eq!(CellValue::Number(42.0).to_string(), "42");
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_compare_nulls_last() {
        let mut values = vec![
            CellValue::Null,
            CellValue::Number(3.0),
            CellValue::Number(1.0),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![CellValue::Number(1.0), CellValue::Number(3.0), CellValue::Null]
        );
        assert_eq!(
            CellValue::from("alice").compare(&CellValue::from("Bob")),
            Ordering::Less
        );
    }

    #[test]
    fn test_compare_mixed_numeric_and_text() {
        let mut values = vec![
            CellValue::Number(100.0),
            CellValue::from("75.5"),
            CellValue::Null,
            CellValue::from("braids"),
            CellValue::Number(40.0),
            CellValue::Bool(true),
            CellValue::from("Acrylic"),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![
                CellValue::Bool(true),
                CellValue::Number(40.0),
                CellValue::from("75.5"),
                CellValue::Number(100.0),
                CellValue::from("Acrylic"),
                CellValue::from("braids"),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn test_compare_is_transitive_across_kinds() {
        let values = [
            CellValue::Number(9.0),
            CellValue::Number(10.0),
            CellValue::from("5"),
            CellValue::from("x"),
            CellValue::Bool(false),
            CellValue::Null,
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a.compare(b), b.compare(a).reverse());
                for c in &values {
                    if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
                        assert_ne!(a.compare(c), Ordering::Greater);
                    }
                }
            }
        }
    }
}
