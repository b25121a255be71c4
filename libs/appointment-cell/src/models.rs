use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::{error::AppError, ids::EntityId};

/// Appointment record as held by the appointment service. Patient and
/// doctor names are denormalized copies captured at booking time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(alias = "id_rdv")]
    pub id: EntityId,
    #[serde(alias = "id_patient")]
    pub patient_id: EntityId,
    pub patient_name: String,
    #[serde(default)]
    pub doctor_id: EntityId,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Terminal records are immutable for everything except read.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAppointmentRequest {
    #[serde(default)]
    pub patient_id: EntityId,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default)]
    pub doctor_id: EntityId,
    #[serde(default)]
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm_option")]
    pub time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub doctor_id: Option<EntityId>,
    pub doctor_name: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Derived, non-persisted projection: the most recent appointment of one
/// patient. Absent entirely when the patient has never been seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LastVisit {
    pub doctor_name: Option<String>,
    pub date: NaiveDate,
}

impl From<&Appointment> for LastVisit {
    fn from(appointment: &Appointment) -> Self {
        Self {
            doctor_name: appointment.doctor_name.clone(),
            date: appointment.date,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment is {status} and can no longer be modified")]
    TerminalState { status: AppointmentStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidStatusTransition { .. }
            | AppointmentError::TerminalState { .. } => AppError::DomainRejection(err.to_string()),
            AppointmentError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

/// Times of day travel as `HH:MM` strings on the wire.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> chrono::ParseResult<NaiveTime> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }
}

pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => super::hhmm::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| super::hhmm::parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
