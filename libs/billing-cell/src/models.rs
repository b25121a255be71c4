use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use shared_models::{error::AppError, ids::EntityId};

/// Invoice as held by the invoice service. `reimbursement` and `remainder`
/// are derived from the base amount by the owning service; `invoice_number`
/// is unique per owning service and opaque here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(alias = "id_facture")]
    pub id: EntityId,
    pub invoice_number: String,
    #[serde(alias = "id_patient")]
    pub patient_id: EntityId,
    pub patient_name: String,
    pub amount: f64,
    #[serde(default)]
    pub reimbursement_pct: f64,
    pub reimbursement: f64,
    pub remainder: f64,
    pub status: InvoiceStatus,
    pub created_on: NaiveDate,
    /// Set exactly once, by the owning service, on the transition to paid.
    #[serde(default, with = "paid_at_format")]
    pub paid_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InvoiceStatus::Paid | InvoiceStatus::Cancelled)
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "pending"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub patient_id: EntityId,
    #[serde(default)]
    pub patient_name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reimbursement_pct: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateInvoiceRequest {
    #[serde(default, deserialize_with = "lenient_f64_option")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64_option")]
    pub reimbursement_pct: Option<f64>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
}

/// Display-rounded breakdown of an amount under a reimbursement rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceQuote {
    pub amount: f64,
    pub reimbursement: f64,
    pub remainder: f64,
}

/// One-time payment receipt emitted when an invoice enters the paid state.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub invoice_number: String,
    pub patient_name: String,
    pub amount: f64,
    pub reimbursement: f64,
    pub remainder: f64,
    pub paid_at: Option<NaiveDateTime>,
}

impl From<&Invoice> for Receipt {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            patient_name: invoice.patient_name.clone(),
            amount: invoice.amount,
            reimbursement: invoice.reimbursement,
            remainder: invoice.remainder,
            paid_at: invoice.paid_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Invoice not found")]
    NotFound,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    #[error("Cannot modify {status} invoice")]
    TerminalState { status: InvoiceStatus },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<BillingError> for AppError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::NotFound => AppError::NotFound(err.to_string()),
            BillingError::InvalidStatusTransition { .. } | BillingError::TerminalState { .. } => {
                AppError::DomainRejection(err.to_string())
            }
            BillingError::ValidationError(msg) => AppError::Validation(msg),
        }
    }
}

/// Payment timestamps travel as `YYYY-MM-DD HH:MM` strings on the wire.
pub mod paid_at_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        s.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// Form values arrive as numbers, numeric strings, nulls or junk; anything
/// unusable becomes 0 rather than an error.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64_option(deserializer)?.unwrap_or(0.0))
}

pub fn lenient_f64_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(match value {
        serde_json::Value::Null => None,
        serde_json::Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Some(s.trim().parse().unwrap_or(0.0)),
        _ => Some(0.0),
    })
}
