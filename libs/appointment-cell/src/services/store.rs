use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_client::rest::RestClient;
use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::{Appointment, CreateAppointmentRequest, UpdateAppointmentRequest};

/// Port to the appointment service. Unlike the directories, the
/// appointment list is primary screen data, so failures propagate and the
/// caller decides whether to degrade.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, AppError>;

    async fn get_appointment(&self, id: &EntityId) -> Result<Appointment, AppError>;

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppError>;

    async fn update_appointment(
        &self,
        id: &EntityId,
        request: &UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError>;
}

pub struct HttpAppointmentStore {
    client: RestClient,
}

impl HttpAppointmentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(&config.appointment_service_url, config.directory_timeout_secs),
        }
    }
}

#[async_trait]
impl AppointmentStore for HttpAppointmentStore {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, AppError> {
        debug!("Fetching appointments from {}", self.client.base_url());

        self.client.request(Method::GET, "/api/rdv", None).await
    }

    async fn get_appointment(&self, id: &EntityId) -> Result<Appointment, AppError> {
        debug!("Fetching appointment {}", id);

        self.client
            .request(Method::GET, &format!("/api/rdv/{}", id), None)
            .await
    }

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        debug!("Creating appointment for patient {}", request.patient_id);

        let body = serde_json::to_value(request)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.client.request(Method::POST, "/api/rdv", Some(body)).await
    }

    async fn update_appointment(
        &self,
        id: &EntityId,
        request: &UpdateAppointmentRequest,
    ) -> Result<Appointment, AppError> {
        debug!("Updating appointment {}", id);

        // Partial update: only send the fields the caller set.
        let mut update_data = serde_json::Map::new();

        if let Some(date) = &request.date {
            update_data.insert("date".to_string(), json!(date));
        }
        if let Some(time) = &request.time {
            update_data.insert("time".to_string(), json!(time.format("%H:%M").to_string()));
        }
        if let Some(reason) = &request.reason {
            update_data.insert("reason".to_string(), json!(reason));
        }
        if let Some(doctor_id) = &request.doctor_id {
            update_data.insert("doctor_id".to_string(), json!(doctor_id));
        }
        if let Some(doctor_name) = &request.doctor_name {
            update_data.insert("doctor_name".to_string(), json!(doctor_name));
        }
        if let Some(status) = &request.status {
            update_data.insert("status".to_string(), json!(status));
        }

        self.client
            .request(
                Method::PUT,
                &format!("/api/rdv/{}", id),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }
}
