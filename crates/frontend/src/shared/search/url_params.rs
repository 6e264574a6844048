//! Отражение критериев поиска в query string
//!
//! Flat scheme, one parameter per criterion: `field=op:value`, e.g.
//! `?status=eq:completed&created_at=between:2024-03-01T00:00:00Z..2024-03-08T00:00:00Z`.
//! Parameters whose value is not a criterion (`active=orders`) belong to other owners
//! and are kept untouched. One criterion per field: a second one on the same field
//! replaces the first in the URL.
//!
//! The pure functions are testable natively; [`UrlParamsSync`] is the browser side.

use contracts::shared::search::SearchCriterion;
use std::collections::BTreeMap;

pub type QueryParams = BTreeMap<String, String>;

pub fn parse_query(query: &str) -> QueryParams {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return QueryParams::new();
    }
    serde_qs::from_str(query).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed query string '{}': {}", query, e);
        QueryParams::new()
    })
}

pub fn build_query(params: &QueryParams) -> String {
    serde_qs::to_string(params).unwrap_or_else(|e| {
        log::warn!("Failed to encode query params: {}", e);
        String::new()
    })
}

fn is_criterion_param(field: &str, value: &str) -> bool {
    SearchCriterion::from_query_pair(field, value).is_ok()
}

/// Replaces every criterion parameter in `params` with `criteria`
pub fn merge_criteria(params: &mut QueryParams, criteria: &[SearchCriterion]) {
    params.retain(|field, value| !is_criterion_param(field, value));
    for criterion in criteria {
        params.insert(criterion.field.clone(), criterion.to_query_value());
    }
}

pub fn criteria_to_query(criteria: &[SearchCriterion]) -> String {
    let mut params = QueryParams::new();
    merge_criteria(&mut params, criteria);
    build_query(&params)
}

/// Criteria found in `query`; foreign and malformed parameters are skipped
pub fn criteria_from_query(query: &str) -> Vec<SearchCriterion> {
    parse_query(query)
        .iter()
        .filter_map(|(field, value)| SearchCriterion::from_query_pair(field, value).ok())
        .collect()
}

/// Browser adapter: reads `location.search`, writes with `history.replaceState`
/// (no new history entry per keystroke)
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlParamsSync;

impl UrlParamsSync {
    pub fn current_params(&self) -> QueryParams {
        let search = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        parse_query(&search)
    }

    pub fn replace_params(&self, params: &QueryParams) {
        let query = build_query(params);
        let new_url = if query.is_empty() {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_string())
        } else {
            format!("?{}", query)
        };

        let current = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        if current == new_url {
            return;
        }

        if let Some(w) = web_sys::window() {
            if let Ok(history) = w.history() {
                if let Err(e) =
                    history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&new_url))
                {
                    log::warn!("history.replaceState failed: {:?}", e);
                }
            }
        }
    }

    /// Read-modify-write of the current query string
    pub fn update(&self, f: impl FnOnce(&mut QueryParams)) {
        let mut params = self.current_params();
        f(&mut params);
        self.replace_params(&params);
    }

    pub fn read_criteria(&self) -> Vec<SearchCriterion> {
        self.current_params()
            .iter()
            .filter_map(|(field, value)| SearchCriterion::from_query_pair(field, value).ok())
            .collect()
    }

    pub fn write_criteria(&self, criteria: &[SearchCriterion]) {
        self.update(|params| merge_criteria(params, criteria));
    }

    pub fn clear_criteria(&self) {
        self.write_criteria(&[]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::search::{SearchOperator, SearchValue};

    fn criteria() -> Vec<SearchCriterion> {
        vec![
            SearchCriterion::new("client.name", SearchOperator::Ilike, "amina"),
            SearchCriterion::new(
                "created_at",
                SearchOperator::Between,
                SearchValue::range("2024-03-01T00:00:00Z", "2024-03-08T00:00:00Z"),
            ),
            SearchCriterion::new("status", SearchOperator::Eq, "completed"),
        ]
    }

    #[test]
    fn test_criteria_round_trip() {
        let query = criteria_to_query(&criteria());
        assert!(!query.is_empty());
        // BTreeMap keeps fields sorted, same order as the fixture
        assert_eq!(criteria_from_query(&query), criteria());
        assert_eq!(criteria_from_query(&format!("?{}", query)), criteria());
    }

    #[test]
    fn test_foreign_params_are_preserved() {
        let mut params = parse_query("active=orders");
        merge_criteria(&mut params, &criteria());
        assert_eq!(params.get("active").map(String::as_str), Some("orders"));
        assert_eq!(params.get("status").map(String::as_str), Some("eq:completed"));

        merge_criteria(&mut params, &[]);
        assert_eq!(params.len(), 1);
        assert!(params.contains_key("active"));
    }

    #[test]
    fn test_malformed_params_are_skipped() {
        let query = "active=orders&total=bogus:5&status=eq:pending";
        let parsed = criteria_from_query(query);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].field, "status");
    }

    #[test]
    fn test_empty_query() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
        assert!(criteria_from_query("").is_empty());
    }
}
