use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, warn};

use shared_client::rest::RestClient;
use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::Patient;

/// Read port for the patient directory service.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Full directory listing, used to populate selection inputs.
    ///
    /// Failures are absorbed here: on network error, timeout, non-2xx or a
    /// malformed body the result is an empty list, which callers must treat
    /// as "unknown", never as "zero patients". The directory is not worth
    /// blocking a screen over.
    async fn list_patients(&self) -> Vec<Patient>;

    /// Single record lookup. A detail view genuinely needs the record, so
    /// absence surfaces as `NotFound`.
    async fn get_patient(&self, id: &EntityId) -> Result<Patient, AppError>;
}

pub struct HttpPatientDirectory {
    client: RestClient,
}

impl HttpPatientDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(&config.patient_service_url, config.directory_timeout_secs),
        }
    }
}

#[async_trait]
impl PatientDirectory for HttpPatientDirectory {
    async fn list_patients(&self) -> Vec<Patient> {
        debug!("Fetching patient directory from {}", self.client.base_url());

        match self.client.request(Method::GET, "/api/patients", None).await {
            Ok(patients) => patients,
            Err(e) => {
                warn!("Patient directory unavailable, substituting empty list: {}", e);
                Vec::new()
            }
        }
    }

    async fn get_patient(&self, id: &EntityId) -> Result<Patient, AppError> {
        debug!("Fetching patient {}", id);

        self.client
            .request(Method::GET, &format!("/api/patients/{}", id), None)
            .await
    }
}
