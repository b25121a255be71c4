use std::env;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_DIRECTORY_TIMEOUT_SECS: u64 = 5;

/// Base addresses of the four owning services, resolved once at startup and
/// passed explicitly to every cell.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub patient_service_url: String,
    pub doctor_service_url: String,
    pub appointment_service_url: String,
    pub invoice_service_url: String,
    /// Upper bound on directory lookups. Directory fetches degrade to an
    /// empty list, so a slow service must not hold a screen hostage.
    pub directory_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let appointment_service_url = env::var("RDV_SERVICE_URL").unwrap_or_else(|_| {
            warn!("RDV_SERVICE_URL not set, using empty value");
            String::new()
        });

        let config = Self {
            patient_service_url: env::var("PATIENTS_SERVICE_URL").unwrap_or_else(|_| {
                warn!("PATIENTS_SERVICE_URL not set, using empty value");
                String::new()
            }),
            doctor_service_url: env::var("DOCTORS_SERVICE_URL").unwrap_or_else(|_| {
                warn!("DOCTORS_SERVICE_URL not set, using empty value");
                String::new()
            }),
            // Invoices are owned by the appointment service deployment
            // unless addressed separately.
            invoice_service_url: env::var("INVOICES_SERVICE_URL")
                .unwrap_or_else(|_| appointment_service_url.clone()),
            appointment_service_url,
            directory_timeout_secs: env::var("DIRECTORY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DIRECTORY_TIMEOUT_SECS),
        };

        if !config.is_configured() {
            warn!("Gateway not fully configured - missing service URL environment variables");
        }

        config
    }

    /// `from_env` plus service discovery: addresses the environment left
    /// blank are filled in from the appointment service's `/api/config`
    /// endpoint. Discovery failure is non-fatal.
    pub async fn discovered() -> Self {
        let mut config = Self::from_env();

        if config.appointment_service_url.is_empty() || config.is_configured() {
            return config;
        }

        match discover(&config.appointment_service_url, config.directory_timeout_secs).await {
            Ok(map) => {
                if config.patient_service_url.is_empty() {
                    if let Some(url) = map.patients_url {
                        config.patient_service_url = url;
                    }
                }
                if config.doctor_service_url.is_empty() {
                    if let Some(url) = map.doctors_url {
                        config.doctor_service_url = url;
                    }
                }
                if config.invoice_service_url.is_empty() {
                    if let Some(url) = map.invoices_url {
                        config.invoice_service_url = url;
                    }
                }
            }
            Err(e) => warn!("Service discovery failed, keeping environment values: {}", e),
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.patient_service_url.is_empty()
            && !self.doctor_service_url.is_empty()
            && !self.appointment_service_url.is_empty()
            && !self.invoice_service_url.is_empty()
    }
}

/// Mapping of collaborator base URLs as published by a service's
/// `/api/config` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceMap {
    pub patients_url: Option<String>,
    pub doctors_url: Option<String>,
    pub invoices_url: Option<String>,
}

pub async fn discover(base_url: &str, timeout_secs: u64) -> Result<ServiceMap> {
    let url = format!("{}/api/config", base_url.trim_end_matches('/'));
    debug!("Discovering service endpoints from {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        bail!("discovery endpoint answered {}", status);
    }

    Ok(response.json().await?)
}
