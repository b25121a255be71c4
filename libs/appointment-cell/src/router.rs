use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn appointment_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/today", get(today_appointments))
        .route("/{id}", get(get_appointment).put(update_appointment))
        .route("/patient/{id}/last", get(last_visit))
        .with_state(config)
}
