use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared_models::ids::EntityId;

/// Canonical patient record as read from the patient directory service.
///
/// Older payloads carry the identifier as `id_patient`; the alias folds
/// both shapes into one before anything downstream sees the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    #[serde(alias = "id_patient")]
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub sex: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    pub address: String,
    pub blood_group: String,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub chronic_conditions: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age(&self, today: NaiveDate) -> i32 {
        today.years_since(self.date_of_birth).unwrap_or(0) as i32
    }
}
