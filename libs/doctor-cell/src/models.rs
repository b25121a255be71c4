use std::fmt;

use serde::{Deserialize, Serialize};

use shared_models::ids::EntityId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: EntityId,
    pub full_name: String,
    pub specialty: String,
    pub status: DoctorStatus,
    #[serde(default)]
    pub patient_count: i32,
}

impl Doctor {
    pub fn is_consultable(&self) -> bool {
        self.status == DoctorStatus::Available
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctorStatus {
    Available,
    InConsultation,
    OnLeave,
}

impl fmt::Display for DoctorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorStatus::Available => write!(f, "available"),
            DoctorStatus::InConsultation => write!(f, "in_consultation"),
            DoctorStatus::OnLeave => write!(f, "on_leave"),
        }
    }
}
