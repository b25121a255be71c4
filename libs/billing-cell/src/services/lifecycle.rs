use tracing::{debug, warn};

use crate::models::{BillingError, InvoiceStatus};

pub struct InvoiceLifecycleService;

impl InvoiceLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current_status: &InvoiceStatus,
        new_status: &InvoiceStatus,
    ) -> Result<(), BillingError> {
        debug!("Validating invoice transition from {} to {}", current_status, new_status);

        if current_status == new_status {
            return Ok(());
        }

        if !self.valid_transitions(current_status).contains(new_status) {
            warn!("Invalid invoice transition attempted: {} -> {}", current_status, new_status);
            return Err(BillingError::InvalidStatusTransition {
                from: *current_status,
                to: *new_status,
            });
        }

        Ok(())
    }

    pub fn valid_transitions(&self, current_status: &InvoiceStatus) -> Vec<InvoiceStatus> {
        match current_status {
            InvoiceStatus::Pending => vec![InvoiceStatus::Paid, InvoiceStatus::Cancelled],
            // Terminal states - no transitions allowed
            InvoiceStatus::Paid => vec![],
            InvoiceStatus::Cancelled => vec![],
        }
    }

    /// Once an invoice is paid or cancelled its amount, percentage and
    /// status are frozen; the editing path is refused before the owning
    /// service is contacted.
    pub fn ensure_editable(&self, current_status: &InvoiceStatus) -> Result<(), BillingError> {
        if current_status.is_terminal() {
            return Err(BillingError::TerminalState {
                status: *current_status,
            });
        }

        Ok(())
    }
}

impl Default for InvoiceLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
