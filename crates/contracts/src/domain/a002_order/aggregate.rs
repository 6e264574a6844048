use crate::shared::row::{CellValue, Row};
use serde::{Deserialize, Serialize};

/// Статус заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn all() -> Vec<OrderStatus> {
        vec![
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ]
    }
}

/// Участник заказа (клиент или специалист)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParty {
    pub id: String,
    pub name: String,
}

/// Заказ услуги
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub order_no: String,
    pub client: OrderParty,
    pub professional: Option<OrderParty>,
    pub service: String,
    pub status: OrderStatus,
    /// Order value (revenue)
    pub total: f64,
    pub total_appointments: i64,
    pub created_at: String,
}

impl Row for Order {
    fn field(&self, path: &str) -> Option<CellValue> {
        let value = match path {
            "id" => CellValue::from(self.id.as_str()),
            "order_no" => CellValue::from(self.order_no.as_str()),
            "client.id" => CellValue::from(self.client.id.as_str()),
            "client.name" => CellValue::from(self.client.name.as_str()),
            "professional.id" => CellValue::from(self.professional.as_ref().map(|p| p.id.clone())),
            "professional.name" => {
                CellValue::from(self.professional.as_ref().map(|p| p.name.clone()))
            }
            "service" => CellValue::from(self.service.as_str()),
            "status" => CellValue::from(self.status.as_str()),
            "total" | "revenue" => CellValue::from(self.total),
            "total_appointments" => CellValue::from(self.total_appointments),
            "created_at" => CellValue::from(self.created_at.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn row_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}
