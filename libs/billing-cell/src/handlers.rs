use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use appointment_cell::services::correlation::CorrelationService;
use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::{lenient_f64, CreateInvoiceRequest, InvoiceStatus, Receipt, UpdateInvoiceRequest};
use crate::services::calculator;
use crate::services::lifecycle::InvoiceLifecycleService;
use crate::services::stats;
use crate::services::store::{HttpInvoiceStore, InvoiceStore};

#[axum::debug_handler]
pub async fn list_invoices(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);

    let mut invoices = store.list_invoices().await?;
    invoices.sort_by(|a, b| b.created_on.cmp(&a.created_on));

    Ok(Json(json!({
        "invoices": invoices,
        "total": invoices.len()
    })))
}

#[axum::debug_handler]
pub async fn get_invoice(
    State(config): State<Arc<AppConfig>>,
    Path(invoice_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);

    let invoice = store.get_invoice(&EntityId::from(invoice_id)).await?;

    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn invoices_for_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);

    let invoices = store
        .invoices_for_patient(&EntityId::from(patient_id))
        .await?;

    Ok(Json(json!({
        "invoices": invoices,
        "total": invoices.len()
    })))
}

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reimbursement_pct: f64,
}

/// Display breakdown for the invoice form, computed without touching the
/// owning service.
#[axum::debug_handler]
pub async fn quote_invoice(Query(query): Query<QuoteQuery>) -> Result<Json<Value>, AppError> {
    calculator::validate_amounts(query.amount, query.reimbursement_pct)?;

    let quote = calculator::quote(query.amount, query.reimbursement_pct);

    Ok(Json(json!(quote)))
}

/// Patients eligible for invoicing: only patients with at least one
/// appointment may be billed. Degrades to an empty list when a directory
/// is unreachable.
#[axum::debug_handler]
pub async fn billable_patients(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    let correlation = CorrelationService::from_config(&config);

    let patients = correlation.billable_patients().await;

    Json(json!({
        "patients": patients,
        "total": patients.len()
    }))
}

#[axum::debug_handler]
pub async fn create_invoice(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<Json<Value>, AppError> {
    // Validation happens before any network call.
    calculator::validate_submission(
        &request.patient_id,
        &request.patient_name,
        request.amount,
        request.reimbursement_pct,
    )?;

    let store = HttpInvoiceStore::new(&config);
    let invoice = store.create_invoice(&request).await?;

    Ok(Json(json!(invoice)))
}

#[axum::debug_handler]
pub async fn update_invoice(
    State(config): State<Arc<AppConfig>>,
    Path(invoice_id): Path<String>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);
    let lifecycle = InvoiceLifecycleService::new();
    let invoice_id = EntityId::from(invoice_id);

    let current = store.get_invoice(&invoice_id).await?;

    // Paid and cancelled invoices are frozen; refuse locally before the
    // owning service is even contacted.
    lifecycle.ensure_editable(&current.status)?;

    if let Some(new_status) = &request.status {
        lifecycle.validate_status_transition(&current.status, new_status)?;
    }

    calculator::validate_amounts(
        request.amount.unwrap_or(current.amount),
        request.reimbursement_pct.unwrap_or(current.reimbursement_pct),
    )?;

    let updated = store.update_invoice(&invoice_id, &request).await?;

    if updated.status == InvoiceStatus::Paid && current.status != InvoiceStatus::Paid {
        let receipt = Receipt::from(&updated);
        info!(
            "Payment receipt issued: invoice {} for {} ({:.2} due)",
            receipt.invoice_number, receipt.patient_name, receipt.remainder
        );
        return Ok(Json(json!({
            "invoice": updated,
            "receipt": receipt
        })));
    }

    Ok(Json(json!(updated)))
}

#[axum::debug_handler]
pub async fn current_year_stats(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);

    let invoices = store.list_invoices().await?;
    let report = stats::revenue_for_year(&invoices, Utc::now().year());

    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn stats_history(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let store = HttpInvoiceStore::new(&config);

    let invoices = store.list_invoices().await?;
    let history = stats::revenue_history(&invoices);

    Ok(Json(json!(history)))
}
