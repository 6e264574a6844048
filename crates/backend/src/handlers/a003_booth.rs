use axum::extract::State;
use axum::Json;
use chrono::Utc;
use contracts::domain::a003_booth::{occupancy_table, Booth, BoothAssignment, BoothOccupancy};

use crate::shared::data::store::Entity;
use crate::shared::error::ApiError;
use crate::AppState;

/// GET /api/booth-occupancy
pub async fn occupancy(State(state): State<AppState>) -> Result<Json<Vec<BoothOccupancy>>, ApiError> {
    let booths: Vec<Booth> = state.typed(Entity::Booths);
    let assignments: Vec<BoothAssignment> = state.typed(Entity::BoothAssignments);
    Ok(Json(occupancy_table(&booths, &assignments, Utc::now())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::store::DataStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_occupancy() {
        let state = Arc::new(DataStore::seeded().unwrap());
        let Json(rows) = occupancy(State(state)).await.unwrap();
        let states: Vec<&str> = rows.iter().map(|r| r.occupancy.as_str()).collect();
        // A1 open-ended, A2 expired + far-future reservation, K1 only cancelled
        assert_eq!(states, vec!["occupied", "reserved", "vacant"]);
    }
}
