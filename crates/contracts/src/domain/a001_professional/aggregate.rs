use crate::shared::row::{CellValue, Row};
use serde::{Deserialize, Serialize};

/// Статус верификации специалиста
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending review",
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Rejected => "Rejected",
        }
    }

    pub fn all() -> Vec<VerificationStatus> {
        vec![
            VerificationStatus::Pending,
            VerificationStatus::Verified,
            VerificationStatus::Rejected,
        ]
    }
}

/// Специалист (beautician) зарегистрированный на площадке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professional {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Service category, e.g. "Hair", "Nails"
    pub specialty: String,
    pub verification_status: VerificationStatus,
    pub rating: Option<f64>,
    pub created_at: String,
}

impl Row for Professional {
    fn field(&self, path: &str) -> Option<CellValue> {
        let value = match path {
            "id" => CellValue::from(self.id.as_str()),
            "full_name" => CellValue::from(self.full_name.as_str()),
            "phone" => CellValue::from(self.phone.clone()),
            "email" => CellValue::from(self.email.clone()),
            "specialty" => CellValue::from(self.specialty.as_str()),
            "verification_status" => CellValue::from(self.verification_status.as_str()),
            "rating" => CellValue::from(self.rating),
            "created_at" => CellValue::from(self.created_at.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn row_key(&self) -> Option<String> {
        Some(self.id.clone())
    }
}
