use shared_models::ids::EntityId;

use crate::models::{BillingError, InvoiceQuote};

/// Portion of the base amount covered by the insurer.
pub fn reimbursement_amount(amount: f64, pct: f64) -> f64 {
    amount * (pct / 100.0)
}

/// What the patient still owes after reimbursement.
pub fn remainder_amount(amount: f64, pct: f64) -> f64 {
    amount - reimbursement_amount(amount, pct)
}

/// Rounding is for display only; stored amounts keep full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn quote(amount: f64, pct: f64) -> InvoiceQuote {
    InvoiceQuote {
        amount: round2(amount),
        reimbursement: round2(reimbursement_amount(amount, pct)),
        remainder: round2(remainder_amount(amount, pct)),
    }
}

/// Checks that must pass before a submission leaves the gateway. The
/// missing-selection check is independent of the arithmetic being
/// well-formed.
pub fn validate_submission(
    patient_id: &EntityId,
    patient_name: &str,
    amount: f64,
    pct: f64,
) -> Result<(), BillingError> {
    if patient_id.is_empty() {
        return Err(BillingError::ValidationError(
            "A patient must be selected".to_string(),
        ));
    }

    if patient_name.trim().is_empty() {
        return Err(BillingError::ValidationError(
            "Patient name is required".to_string(),
        ));
    }

    validate_amounts(amount, pct)
}

pub fn validate_amounts(amount: f64, pct: f64) -> Result<(), BillingError> {
    if amount < 0.0 {
        return Err(BillingError::ValidationError(
            "Amount must not be negative".to_string(),
        ));
    }

    if !(0.0..=100.0).contains(&pct) {
        return Err(BillingError::ValidationError(
            "Reimbursement percentage must be between 0 and 100".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_reference_invoice_breakdown() {
        // 1000 at 10% reimbursement.
        assert_eq!(reimbursement_amount(1000.0, 10.0), 100.0);
        assert_eq!(remainder_amount(1000.0, 10.0), 900.0);

        let quote = quote(1000.0, 10.0);
        assert_eq!(quote.reimbursement, 100.00);
        assert_eq!(quote.remainder, 900.00);
    }

    #[test]
    fn test_parts_always_sum_to_amount() {
        for amount in [0.0, 0.01, 19.99, 150.0, 1234.56, 100000.0] {
            for pct in [0.0, 1.0, 12.5, 33.0, 50.0, 99.0, 100.0] {
                let sum = reimbursement_amount(amount, pct) + remainder_amount(amount, pct);
                assert!(
                    (sum - amount).abs() < 1e-6,
                    "amount={} pct={} sum={}",
                    amount,
                    pct,
                    sum
                );
            }
        }
    }

    #[test]
    fn test_zero_percent_leaves_full_remainder() {
        assert_eq!(reimbursement_amount(150.0, 0.0), 0.0);
        assert_eq!(remainder_amount(150.0, 0.0), 150.0);
    }

    #[test]
    fn test_full_reimbursement_leaves_nothing_to_pay() {
        assert_eq!(reimbursement_amount(150.0, 100.0), 150.0);
        assert_eq!(remainder_amount(150.0, 100.0), 0.0);
    }

    #[test]
    fn test_quote_rounds_for_display() {
        let quote = quote(99.99, 33.0);
        assert_eq!(quote.reimbursement, 33.0);
        assert_eq!(quote.remainder, 66.99);
    }

    #[test]
    fn test_submission_requires_patient_selection() {
        let result = validate_submission(&EntityId::default(), "", 150.0, 10.0);
        assert_matches!(result, Err(BillingError::ValidationError(msg)) if msg.contains("patient"));
    }

    #[test]
    fn test_submission_rejects_out_of_range_percentage() {
        let patient = EntityId::from("P001");

        assert_matches!(
            validate_submission(&patient, "Amel Cherif", 150.0, 101.0),
            Err(BillingError::ValidationError(_))
        );
        assert_matches!(
            validate_submission(&patient, "Amel Cherif", 150.0, -1.0),
            Err(BillingError::ValidationError(_))
        );
        assert!(validate_submission(&patient, "Amel Cherif", 150.0, 100.0).is_ok());
    }

    #[test]
    fn test_submission_rejects_negative_amount() {
        let patient = EntityId::from("P001");

        assert_matches!(
            validate_submission(&patient, "Amel Cherif", -0.01, 10.0),
            Err(BillingError::ValidationError(_))
        );
    }
}
