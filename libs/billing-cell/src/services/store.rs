use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_client::rest::RestClient;
use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::{CreateInvoiceRequest, Invoice, UpdateInvoiceRequest};

/// Port to the invoice service. The service owns persistence, invoice
/// numbering and the final say on immutability; this side only composes
/// requests and surfaces its rejections.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;

    async fn get_invoice(&self, id: &EntityId) -> Result<Invoice, AppError>;

    async fn invoices_for_patient(&self, patient_id: &EntityId) -> Result<Vec<Invoice>, AppError>;

    async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<Invoice, AppError>;

    async fn update_invoice(
        &self,
        id: &EntityId,
        request: &UpdateInvoiceRequest,
    ) -> Result<Invoice, AppError>;
}

pub struct HttpInvoiceStore {
    client: RestClient,
}

impl HttpInvoiceStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RestClient::new(&config.invoice_service_url, config.directory_timeout_secs),
        }
    }
}

#[async_trait]
impl InvoiceStore for HttpInvoiceStore {
    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        debug!("Fetching invoices from {}", self.client.base_url());

        self.client.request(Method::GET, "/api/factures", None).await
    }

    async fn get_invoice(&self, id: &EntityId) -> Result<Invoice, AppError> {
        debug!("Fetching invoice {}", id);

        self.client
            .request(Method::GET, &format!("/api/factures/{}", id), None)
            .await
    }

    async fn invoices_for_patient(&self, patient_id: &EntityId) -> Result<Vec<Invoice>, AppError> {
        debug!("Fetching invoices for patient {}", patient_id);

        self.client
            .request(Method::GET, &format!("/api/factures/patient/{}", patient_id), None)
            .await
    }

    async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<Invoice, AppError> {
        debug!("Creating invoice for patient {}", request.patient_id);

        let body = serde_json::to_value(request)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        self.client
            .request(Method::POST, "/api/factures", Some(body))
            .await
    }

    async fn update_invoice(
        &self,
        id: &EntityId,
        request: &UpdateInvoiceRequest,
    ) -> Result<Invoice, AppError> {
        debug!("Updating invoice {}", id);

        let mut update_data = serde_json::Map::new();

        if let Some(amount) = request.amount {
            update_data.insert("amount".to_string(), json!(amount));
        }
        if let Some(pct) = request.reimbursement_pct {
            update_data.insert("reimbursement_pct".to_string(), json!(pct));
        }
        if let Some(status) = &request.status {
            update_data.insert("status".to_string(), json!(status));
        }

        self.client
            .request(
                Method::PUT,
                &format!("/api/factures/{}", id),
                Some(serde_json::Value::Object(update_data)),
            )
            .await
    }
}
