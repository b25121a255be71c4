use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;

/// Test configuration pointing every owning service at one address,
/// usually a wiremock server.
pub struct TestEndpoints {
    pub base_url: String,
    pub directory_timeout_secs: u64,
}

impl TestEndpoints {
    pub fn all(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            directory_timeout_secs: 2,
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            patient_service_url: self.base_url.clone(),
            doctor_service_url: self.base_url.clone(),
            appointment_service_url: self.base_url.clone(),
            invoice_service_url: self.base_url.clone(),
            directory_timeout_secs: self.directory_timeout_secs,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned JSON bodies in the shapes the owning services answer with.
pub struct MockServiceResponses;

impl MockServiceResponses {
    pub fn patient_response(id: &str, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": "1988-04-12",
            "sex": "F",
            "phone": "0550 12 34 56",
            "email": null,
            "address": "12 Rue des Oliviers",
            "blood_group": "O+",
            "allergies": null,
            "chronic_conditions": null,
            "photo": "default.jpg"
        })
    }

    /// Same record in the legacy shape some payloads still use: the id
    /// travels as `id_patient` and as a number.
    pub fn legacy_patient_response(id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id_patient": id,
            "first_name": first_name,
            "last_name": last_name,
            "date_of_birth": "1975-11-02",
            "sex": "M",
            "phone": "0770 98 76 54",
            "email": "legacy@example.com",
            "address": "3 Avenue Pasteur",
            "blood_group": "A-",
            "allergies": "Penicillin",
            "chronic_conditions": null,
            "photo": "default.jpg"
        })
    }

    pub fn doctor_response(id: i64, full_name: &str, specialty: &str) -> serde_json::Value {
        json!({
            "id": id,
            "full_name": full_name,
            "specialty": specialty,
            "status": "available",
            "patient_count": 45
        })
    }

    pub fn appointment_response(
        id: i64,
        patient_id: &str,
        patient_name: &str,
        date: &str,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "patient_name": patient_name,
            "doctor_id": 1,
            "doctor_name": "Dr. Benali",
            "date": date,
            "time": "10:30",
            "reason": "Consultation",
            "status": status
        })
    }

    pub fn invoice_response(
        id: i64,
        patient_id: &str,
        patient_name: &str,
        amount: f64,
        reimbursement: f64,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "invoice_number": format!("INV-2025-{:03}", id),
            "patient_id": patient_id,
            "patient_name": patient_name,
            "amount": amount,
            "reimbursement_pct": if amount > 0.0 { reimbursement / amount * 100.0 } else { 0.0 },
            "reimbursement": reimbursement,
            "remainder": amount - reimbursement,
            "status": status,
            "created_on": "2025-06-01",
            "paid_at": if status == "paid" { Some("2025-06-15 14:30") } else { None }
        })
    }

    pub fn error_response(message: &str) -> serde_json::Value {
        json!({
            "error": message
        })
    }
}
