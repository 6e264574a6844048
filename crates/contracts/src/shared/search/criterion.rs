use crate::shared::row::CellValue;
use crate::shared::time_window::TimeWindow;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ошибки построения и разбора поисковых условий
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Search criterion has an empty field name")]
    EmptyField,

    #[error("Unknown search operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid value for '{operator}' on '{field}': {reason}")]
    InvalidValue {
        field: String,
        operator: SearchOperator,
        reason: String,
    },

    #[error("Malformed query parameter '{0}'")]
    MalformedParam(String),
}

/// Search operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOperator {
    Eq,
    Neq,
    /// Case-insensitive substring
    Ilike,
    /// Case-sensitive substring
    Like,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Closed range `[start, end]`
    Between,
    In,
}

impl SearchOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOperator::Eq => "eq",
            SearchOperator::Neq => "neq",
            SearchOperator::Ilike => "ilike",
            SearchOperator::Like => "like",
            SearchOperator::Gt => "gt",
            SearchOperator::Gte => "gte",
            SearchOperator::Lt => "lt",
            SearchOperator::Lte => "lte",
            SearchOperator::Between => "between",
            SearchOperator::In => "in",
        }
    }

    /// Get display symbol for UI
    pub fn symbol(&self) -> &'static str {
        match self {
            SearchOperator::Eq => "=",
            SearchOperator::Neq => "≠",
            SearchOperator::Ilike | SearchOperator::Like => "~",
            SearchOperator::Gt => ">",
            SearchOperator::Gte => "≥",
            SearchOperator::Lt => "<",
            SearchOperator::Lte => "≤",
            SearchOperator::Between => "∈",
            SearchOperator::In => "in",
        }
    }

    pub fn all() -> &'static [SearchOperator] {
        &[
            SearchOperator::Eq,
            SearchOperator::Neq,
            SearchOperator::Ilike,
            SearchOperator::Like,
            SearchOperator::Gt,
            SearchOperator::Gte,
            SearchOperator::Lt,
            SearchOperator::Lte,
            SearchOperator::Between,
            SearchOperator::In,
        ]
    }
}

impl fmt::Display for SearchOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchOperator {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchOperator::all()
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| SearchError::UnknownOperator(s.to_string()))
    }
}

/// Criterion value: a scalar, or a list (`[start, end]` for `between`, members for `in`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchValue {
    List(Vec<CellValue>),
    Scalar(CellValue),
}

impl SearchValue {
    pub fn range(start: impl Into<CellValue>, end: impl Into<CellValue>) -> Self {
        SearchValue::List(vec![start.into(), end.into()])
    }

    /// Empty text, null and empty lists count as "no value"
    pub fn is_empty(&self) -> bool {
        match self {
            SearchValue::Scalar(CellValue::Null) => true,
            SearchValue::Scalar(CellValue::Text(s)) => s.trim().is_empty(),
            SearchValue::Scalar(_) => false,
            SearchValue::List(items) => items.is_empty(),
        }
    }
}

impl<T: Into<CellValue>> From<T> for SearchValue {
    fn from(value: T) -> Self {
        SearchValue::Scalar(value.into())
    }
}

/// One `(field, operator, value)` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriterion {
    pub field: String,
    pub operator: SearchOperator,
    pub value: SearchValue,
}

impl SearchCriterion {
    pub fn new(
        field: impl Into<String>,
        operator: SearchOperator,
        value: impl Into<SearchValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Checks that the value shape fits the operator
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.field.trim().is_empty() {
            return Err(SearchError::EmptyField);
        }
        let invalid = |reason: &str| SearchError::InvalidValue {
            field: self.field.clone(),
            operator: self.operator,
            reason: reason.to_string(),
        };
        match (self.operator, &self.value) {
            (SearchOperator::Between, SearchValue::List(items)) if items.len() == 2 => Ok(()),
            (SearchOperator::Between, _) => Err(invalid("expected [start, end]")),
            (SearchOperator::In, SearchValue::List(items)) if !items.is_empty() => Ok(()),
            (SearchOperator::In, _) => Err(invalid("expected a non-empty list")),
            (_, SearchValue::List(_)) => Err(invalid("expected a single value")),
            (_, SearchValue::Scalar(_)) => Ok(()),
        }
    }

    /// Human readable form, e.g. `status = completed`
    pub fn display_text(&self) -> String {
        let value = match &self.value {
            SearchValue::Scalar(v) => v.to_string(),
            SearchValue::List(items) if self.operator == SearchOperator::Between => {
                let start = items.first().map(|v| v.to_string()).unwrap_or_default();
                let end = items.get(1).map(|v| v.to_string()).unwrap_or_default();
                format!("[{}..{}]", start, end)
            }
            SearchValue::List(items) => items
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        };
        format!("{} {} {}", self.field, self.operator.symbol(), value)
    }

    /// Flat query-string value: `op:value`, `between:start..end`, `in:a,b`
    pub fn to_query_value(&self) -> String {
        let value = match &self.value {
            SearchValue::Scalar(v) => v.to_string(),
            SearchValue::List(items) => {
                let separator = if self.operator == SearchOperator::Between {
                    ".."
                } else {
                    ","
                };
                items
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(separator)
            }
        };
        format!("{}:{}", self.operator.as_str(), value)
    }

    /// Inverse of [`SearchCriterion::to_query_value`]. Values come back as text.
    pub fn from_query_pair(field: &str, raw: &str) -> Result<Self, SearchError> {
        let (op, value) = raw
            .split_once(':')
            .ok_or_else(|| SearchError::MalformedParam(format!("{}={}", field, raw)))?;
        let operator: SearchOperator = op.parse()?;
        let value = match operator {
            SearchOperator::Between => {
                let (start, end) = value
                    .split_once("..")
                    .ok_or_else(|| SearchError::MalformedParam(format!("{}={}", field, raw)))?;
                SearchValue::range(start, end)
            }
            SearchOperator::In => SearchValue::List(
                value
                    .split(',')
                    .filter(|s| !s.is_empty())
                    .map(CellValue::from)
                    .collect(),
            ),
            _ => SearchValue::from(value),
        };
        let criterion = SearchCriterion {
            field: field.to_string(),
            operator,
            value,
        };
        criterion.validate()?;
        Ok(criterion)
    }
}

/// Payload of the remote search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchCriteria")]
    pub search_criteria: Vec<SearchCriterion>,
}

impl SearchRequest {
    pub fn new(search_criteria: Vec<SearchCriterion>) -> Self {
        Self { search_criteria }
    }

    /// Adds a `between` criterion on `field` covering `window`, replacing any earlier
    /// range on the same field
    pub fn with_time_range(mut self, field: &str, window: TimeWindow, now: DateTime<Utc>) -> Self {
        let (start, end) = window.range(now);
        self.search_criteria
            .retain(|c| !(c.field == field && c.operator == SearchOperator::Between));
        self.search_criteria.push(SearchCriterion::new(
            field,
            SearchOperator::Between,
            SearchValue::range(
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
                end.to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ));
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        self.search_criteria.iter().try_for_each(|c| c.validate())
    }
}

/// Response of the remote search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<R> {
    pub data: Vec<R>,
}
