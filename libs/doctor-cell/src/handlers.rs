use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::services::directory::{DoctorDirectory, HttpDoctorDirectory};

#[axum::debug_handler]
pub async fn list_doctors(State(config): State<Arc<AppConfig>>) -> Json<Value> {
    let directory = HttpDoctorDirectory::new(&config);

    let doctors = directory.list_doctors().await;

    Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    }))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let directory = HttpDoctorDirectory::new(&config);

    let doctor = directory.get_doctor(&EntityId::from(doctor_id)).await?;

    Ok(Json(json!(doctor)))
}
