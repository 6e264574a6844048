use crate::shared::row::{CellValue, Row};
use serde::{Deserialize, Serialize};

/// Рабочее место (booth), сдаваемое специалистам в аренду
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booth {
    pub id: String,
    pub name: String,
    pub location: String,
    pub daily_rate: f64,
}

impl Row for Booth {
    fn field(&self, path: &str) -> Option<CellValue> {
        let value = match path {
            "id" => CellValue::from(self.id.as_str()),
            "name" => CellValue::from(self.name.as_str()),
            "location" => CellValue::from(self.location.as_str()),
            "daily_rate" => CellValue::from(self.daily_rate),
            _ => return None,
        };
        Some(value)
    }

    fn row_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Cancelled,
}

/// Назначение специалиста на booth на период
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoothAssignment {
    pub id: String,
    pub booth_id: String,
    pub professional_id: String,
    pub professional_name: String,
    pub start_date: String,
    /// Open-ended when `None`
    pub end_date: Option<String>,
    pub status: AssignmentStatus,
}

impl Row for BoothAssignment {
    fn field(&self, path: &str) -> Option<CellValue> {
        let value = match path {
            "id" => CellValue::from(self.id.as_str()),
            "booth_id" => CellValue::from(self.booth_id.as_str()),
            "professional_id" => CellValue::from(self.professional_id.as_str()),
            "professional_name" => CellValue::from(self.professional_name.as_str()),
            "start_date" => CellValue::from(self.start_date.as_str()),
            "end_date" => CellValue::from(self.end_date.clone()),
            "status" => CellValue::from(match self.status {
                AssignmentStatus::Active => "active",
                AssignmentStatus::Cancelled => "cancelled",
            }),
            _ => return None,
        };
        Some(value)
    }

    fn row_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}
