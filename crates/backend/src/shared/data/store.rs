//! In-memory хранилище списков, загружаемое из JSON фикстур
//!
//! Each collection is read from `{data_dir}/{entity}.json` (an array of objects).
//! Missing files fall back to the seed set compiled into the binary. Rows are kept as
//! `serde_json::Value` so search runs over any field path of any collection.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Orders,
    Professionals,
    Booths,
    BoothAssignments,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Orders => "orders",
            Entity::Professionals => "professionals",
            Entity::Booths => "booths",
            Entity::BoothAssignments => "booth_assignments",
        }
    }

    pub fn all() -> &'static [Entity] {
        &[
            Entity::Orders,
            Entity::Professionals,
            Entity::Booths,
            Entity::BoothAssignments,
        ]
    }

    fn seed(&self) -> &'static str {
        match self {
            Entity::Orders => include_str!("../../../data/orders.json"),
            Entity::Professionals => include_str!("../../../data/professionals.json"),
            Entity::Booths => include_str!("../../../data/booths.json"),
            Entity::BoothAssignments => include_str!("../../../data/booth_assignments.json"),
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::all()
            .iter()
            .copied()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Default)]
pub struct DataStore {
    collections: HashMap<Entity, Vec<Value>>,
}

impl DataStore {
    /// Loads every collection from `data_dir`, using the embedded seed for missing files
    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let mut collections = HashMap::new();
        for entity in Entity::all() {
            let path = data_dir.join(format!("{}.json", entity));
            let rows = if path.exists() {
                tracing::info!("Loading {} from {}", entity, path.display());
                parse_rows(&std::fs::read_to_string(&path)?)
                    .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
            } else {
                tracing::warn!("{} not found, using embedded seed for {}", path.display(), entity);
                parse_rows(entity.seed())?
            };
            tracing::info!("{}: {} rows", entity, rows.len());
            collections.insert(*entity, rows);
        }
        Ok(Self { collections })
    }

    /// Store with embedded seed data only
    pub fn seeded() -> anyhow::Result<Self> {
        let mut collections = HashMap::new();
        for entity in Entity::all() {
            collections.insert(*entity, parse_rows(entity.seed())?);
        }
        Ok(Self { collections })
    }

    pub fn with_rows(mut self, entity: Entity, rows: Vec<Value>) -> Self {
        self.collections.insert(entity, rows);
        self
    }

    pub fn rows(&self, entity: Entity) -> &[Value] {
        self.collections
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Typed view of a collection; rows that do not deserialize are skipped
    pub fn typed<T: serde::de::DeserializeOwned>(&self, entity: Entity) -> Vec<T> {
        self.rows(entity)
            .iter()
            .filter_map(|row| match serde_json::from_value(row.clone()) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("Skipping malformed {} row: {}", entity, e);
                    None
                }
            })
            .collect()
    }
}

fn parse_rows(json: &str) -> anyhow::Result<Vec<Value>> {
    let rows: Vec<Value> = serde_json::from_str(json)?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_order::Order;

    #[test]
    fn test_seed_parses_into_domain_types() {
        let store = DataStore::seeded().unwrap();
        for entity in Entity::all() {
            assert!(!store.rows(*entity).is_empty(), "{} seed is empty", entity);
        }
        let orders: Vec<Order> = store.typed(Entity::Orders);
        assert_eq!(orders.len(), store.rows(Entity::Orders).len());
    }

    #[test]
    fn test_missing_directory_falls_back_to_seed() {
        let dir = std::env::temp_dir().join("tausi-no-such-fixture-dir");
        let store = DataStore::load(&dir).unwrap();
        assert!(!store.rows(Entity::Booths).is_empty());
    }

    #[test]
    fn test_entity_names() {
        assert_eq!("booth_assignments".parse::<Entity>(), Ok(Entity::BoothAssignments));
        assert!("ledgers".parse::<Entity>().is_err());
    }
}
