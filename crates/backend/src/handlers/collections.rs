use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use contracts::shared::search::{filter_rows_cloned, SearchRequest, SearchResponse};
use contracts::shared::time_window::{filter_by_window, TimeWindow};
use serde::Deserialize;
use serde_json::Value;

use crate::shared::data::store::Entity;
use crate::shared::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Relative window name (`last_7_days`...)
    pub window: Option<String>,
    /// Date field the window applies to (defaults to `created_at`)
    pub date_field: Option<String>,
}

fn parse_entity(raw: &str) -> Result<Entity, ApiError> {
    raw.parse::<Entity>()
        .map_err(|_| ApiError::UnknownEntity(raw.to_string()))
}

/// GET /api/:entity
pub async fn list(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let entity = parse_entity(&entity)?;
    let rows = state.rows(entity);

    if let Some(window) = query.window.as_deref() {
        window
            .parse::<TimeWindow>()
            .map_err(ApiError::InvalidQuery)?;
    }
    let date_field = query.date_field.as_deref().unwrap_or("created_at");
    let filtered: Vec<Value> = filter_by_window(rows, date_field, query.window.as_deref(), Utc::now())
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!("{}: {} of {} rows", entity, filtered.len(), rows.len());
    Ok(Json(filtered))
}

/// POST /api/:entity/search
pub async fn search(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse<Value>>, ApiError> {
    let entity = parse_entity(&entity)?;
    request.validate()?;

    let data = filter_rows_cloned(state.rows(entity), &request.search_criteria);
    tracing::info!(
        "Search {} with {} criteria: {} rows",
        entity,
        request.search_criteria.len(),
        data.len()
    );
    Ok(Json(SearchResponse { data }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::store::DataStore;
    use contracts::shared::search::{SearchCriterion, SearchOperator, SearchValue};
    use serde_json::json;
    use std::sync::Arc;

    fn state() -> AppState {
        Arc::new(DataStore::default().with_rows(
            Entity::Orders,
            vec![
                json!({"id": "o1", "status": "completed", "client": {"name": "Amina"}}),
                json!({"id": "o2", "status": "pending", "client": {"name": "Baraka"}}),
            ],
        ))
    }

    #[tokio::test]
    async fn test_search_filters_by_criteria() {
        let request = SearchRequest::new(vec![SearchCriterion::new(
            "client.name",
            SearchOperator::Ilike,
            "amin",
        )]);
        let Json(response) = search(State(state()), Path("orders".into()), Json(request))
            .await
            .unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0]["id"], "o1");
    }

    #[tokio::test]
    async fn test_search_rejects_malformed_between() {
        let request = SearchRequest::new(vec![SearchCriterion::new(
            "status",
            SearchOperator::Between,
            SearchValue::from("x"),
        )]);
        let err = search(State(state()), Path("orders".into()), Json(request))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_entity_is_not_found() {
        let err = list(State(state()), Path("ledgers".into()), Query(ListQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_without_window_returns_everything() {
        let Json(rows) = list(State(state()), Path("orders".into()), Query(ListQuery::default()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);

        let bad_window = ListQuery {
            window: Some("last_century".into()),
            date_field: None,
        };
        let err = list(State(state()), Path("orders".into()), Query(bad_window))
            .await
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }
}
