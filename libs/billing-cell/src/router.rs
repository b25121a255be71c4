use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers::*;

pub fn invoice_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/quote", get(quote_invoice))
        .route("/patients", get(billable_patients))
        .route("/{id}", get(get_invoice).put(update_invoice))
        .route("/patient/{id}", get(invoices_for_patient))
        .with_state(config)
}

pub fn stats_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(current_year_stats))
        .route("/history", get(stats_history))
        .with_state(config)
}
