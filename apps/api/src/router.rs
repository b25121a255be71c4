use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use appointment_cell::router::appointment_routes;
use billing_cell::router::{invoice_routes, stats_routes};
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic gateway is running!" }))
        .route("/api/config", get(service_map))
        .with_state(state.clone())
        .nest("/api/patients", patient_routes(state.clone()))
        .nest("/api/doctors", doctor_routes(state.clone()))
        .nest("/api/rdv", appointment_routes(state.clone()))
        .nest("/api/factures", invoice_routes(state.clone()))
        .nest("/api/stats", stats_routes(state))
}

/// Resolved collaborator addresses, republished so front-ends can wire
/// themselves without hardcoding hosts.
async fn service_map(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "patients_url": config.patient_service_url,
        "doctors_url": config.doctor_service_url,
        "rdv_url": config.appointment_service_url,
        "invoices_url": config.invoice_service_url,
    }))
}
