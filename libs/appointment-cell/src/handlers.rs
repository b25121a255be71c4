use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::info;

use shared_config::AppConfig;
use shared_models::{error::AppError, ids::EntityId};

use crate::models::{AppointmentStatus, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::services::correlation::CorrelationService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::services::store::{AppointmentStore, HttpAppointmentStore};

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let store = HttpAppointmentStore::new(&config);

    let mut appointments = store.list_appointments().await?;
    appointments.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn today_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let store = HttpAppointmentStore::new(&config);
    let today = Utc::now().date_naive();

    let mut appointments = store.list_appointments().await?;
    appointments.retain(|a| a.date == today);
    appointments.sort_by_key(|a| a.time);

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let store = HttpAppointmentStore::new(&config);

    let appointment = store.get_appointment(&EntityId::from(appointment_id)).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new();

    // Validation happens before any network call.
    lifecycle.validate_submission(&request, Utc::now().naive_utc())?;

    let store = HttpAppointmentStore::new(&config);
    let appointment = store.create_appointment(&request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let store = HttpAppointmentStore::new(&config);
    let lifecycle = AppointmentLifecycleService::new();
    let appointment_id = EntityId::from(appointment_id);

    let current = store.get_appointment(&appointment_id).await?;
    lifecycle.ensure_editable(&current.status)?;

    if let Some(new_status) = &request.status {
        lifecycle.validate_status_transition(&current.status, new_status)?;

        if *new_status == AppointmentStatus::Completed {
            let starts_at = request
                .date
                .unwrap_or(current.date)
                .and_time(request.time.unwrap_or(current.time));
            lifecycle.validate_completion_time(starts_at, Utc::now().naive_utc())?;
        }
    }

    let updated = store.update_appointment(&appointment_id, &request).await?;

    if updated.status == AppointmentStatus::Completed && current.status != AppointmentStatus::Completed
    {
        info!(
            "Consultation receipt issued: appointment {} for {} on {}",
            updated.id, updated.patient_name, updated.date
        );
    }

    Ok(Json(json!(updated)))
}

#[axum::debug_handler]
pub async fn last_visit(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<String>,
) -> Json<Value> {
    let correlation = CorrelationService::from_config(&config);

    // None renders as "no visit on record", never as an error.
    let visit = correlation.last_visit(&EntityId::from(patient_id)).await;

    Json(json!({ "last_visit": visit }))
}
