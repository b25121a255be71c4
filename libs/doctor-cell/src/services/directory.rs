use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, warn};

use shared_client::rest::RestClient;
use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::Doctor;

/// Read port for the doctor directory service. Same degradation contract
/// as the patient directory: listing failures become an empty list.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn list_doctors(&self) -> Vec<Doctor>;

    async fn get_doctor(&self, id: &EntityId) -> Result<Doctor, AppError>;
}

pub struct HttpDoctorDirectory {
    client: RestClient,
}

impl HttpDoctorDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(&config.doctor_service_url, config.directory_timeout_secs),
        }
    }
}

#[async_trait]
impl DoctorDirectory for HttpDoctorDirectory {
    async fn list_doctors(&self) -> Vec<Doctor> {
        debug!("Fetching doctor directory from {}", self.client.base_url());

        match self.client.request(Method::GET, "/api/doctors", None).await {
            Ok(doctors) => doctors,
            Err(e) => {
                warn!("Doctor directory unavailable, substituting empty list: {}", e);
                Vec::new()
            }
        }
    }

    async fn get_doctor(&self, id: &EntityId) -> Result<Doctor, AppError> {
        debug!("Fetching doctor {}", id);

        self.client
            .request(Method::GET, &format!("/api/doctors/{}", id), None)
            .await
    }
}
