use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::services::directory::{HttpPatientDirectory, PatientDirectory};

#[axum::debug_handler]
pub async fn list_patients(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    let directory = HttpPatientDirectory::new(&config);

    let patients = directory.list_patients().await;

    Json(json!({
        "patients": patients,
        "total": patients.len()
    }))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let directory = HttpPatientDirectory::new(&config);

    let patient = directory.get_patient(&EntityId::from(patient_id)).await?;

    Ok(Json(json!(patient)))
}
