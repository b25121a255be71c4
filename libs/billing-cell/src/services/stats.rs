use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Serialize;

use crate::models::{Invoice, InvoiceStatus};
use crate::services::calculator::round2;

/// Paid revenue for one calendar year, keyed by payment date.
#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub year: i32,
    pub total: f64,
    /// Twelve entries, January first.
    pub monthly: Vec<f64>,
    pub invoice_count: usize,
}

pub fn revenue_for_year(invoices: &[Invoice], year: i32) -> RevenueReport {
    let mut monthly = vec![0.0; 12];
    let mut invoice_count = 0;

    for invoice in paid_in_year(invoices, year) {
        let month = invoice.paid_at.map(|d| d.month0() as usize).unwrap_or(0);
        monthly[month] += invoice.amount;
        invoice_count += 1;
    }

    let total = round2(monthly.iter().sum());
    let monthly = monthly.into_iter().map(round2).collect();

    RevenueReport {
        year,
        total,
        monthly,
        invoice_count,
    }
}

/// Full revenue history, most recent year first.
pub fn revenue_history(invoices: &[Invoice]) -> Vec<RevenueReport> {
    let mut years: BTreeSet<i32> = BTreeSet::new();
    for invoice in invoices {
        if invoice.status == InvoiceStatus::Paid {
            if let Some(paid_at) = invoice.paid_at {
                years.insert(paid_at.year());
            }
        }
    }

    years
        .into_iter()
        .rev()
        .map(|year| revenue_for_year(invoices, year))
        .collect()
}

fn paid_in_year(invoices: &[Invoice], year: i32) -> impl Iterator<Item = &Invoice> {
    invoices.iter().filter(move |invoice| {
        invoice.status == InvoiceStatus::Paid
            && invoice.paid_at.map(|d| d.year() == year).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice(id: i64, amount: f64, status: &str, paid_at: Option<&str>) -> Invoice {
        serde_json::from_value(json!({
            "id": id,
            "invoice_number": format!("INV-2025-{:03}", id),
            "patient_id": "P001",
            "patient_name": "Amel Cherif",
            "amount": amount,
            "reimbursement": 0.0,
            "remainder": amount,
            "status": status,
            "created_on": "2025-01-01",
            "paid_at": paid_at
        }))
        .unwrap()
    }

    #[test]
    fn test_only_paid_invoices_count() {
        let invoices = vec![
            invoice(1, 100.0, "paid", Some("2025-03-10 09:00")),
            invoice(2, 250.0, "pending", None),
            invoice(3, 75.5, "cancelled", None),
        ];

        let report = revenue_for_year(&invoices, 2025);

        assert_eq!(report.total, 100.0);
        assert_eq!(report.invoice_count, 1);
        assert_eq!(report.monthly[2], 100.0);
    }

    #[test]
    fn test_revenue_buckets_by_payment_month() {
        let invoices = vec![
            invoice(1, 100.0, "paid", Some("2025-01-15 10:00")),
            invoice(2, 200.0, "paid", Some("2025-01-20 16:45")),
            invoice(3, 50.0, "paid", Some("2025-12-02 11:30")),
        ];

        let report = revenue_for_year(&invoices, 2025);

        assert_eq!(report.monthly[0], 300.0);
        assert_eq!(report.monthly[11], 50.0);
        assert_eq!(report.total, 350.0);
    }

    #[test]
    fn test_revenue_ignores_other_years() {
        let invoices = vec![
            invoice(1, 100.0, "paid", Some("2024-06-15 10:00")),
            invoice(2, 200.0, "paid", Some("2025-06-15 10:00")),
        ];

        let report = revenue_for_year(&invoices, 2025);

        assert_eq!(report.total, 200.0);
        assert_eq!(report.invoice_count, 1);
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let invoices = vec![
            invoice(1, 100.0, "paid", Some("2023-06-15 10:00")),
            invoice(2, 200.0, "paid", Some("2025-06-15 10:00")),
            invoice(3, 300.0, "paid", Some("2024-06-15 10:00")),
        ];

        let history = revenue_history(&invoices);

        let years: Vec<i32> = history.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2025, 2024, 2023]);
        assert_eq!(history[0].total, 200.0);
    }

    #[test]
    fn test_history_empty_without_payments() {
        let invoices = vec![invoice(1, 100.0, "pending", None)];
        assert!(revenue_history(&invoices).is_empty());
    }
}
