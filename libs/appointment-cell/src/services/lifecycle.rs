use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::models::{AppointmentError, AppointmentStatus, CreateAppointmentRequest};

pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if current_status == new_status {
            return Ok(());
        }

        if !self.valid_transitions(current_status).contains(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: *current_status,
                to: *new_status,
            });
        }

        Ok(())
    }

    /// All valid next statuses for a given current status
    pub fn valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::InProgress,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::InProgress => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }

    /// Terminal records degrade to a display-only summary; every mutation
    /// against them is refused before the owning service is contacted.
    pub fn ensure_editable(&self, current_status: &AppointmentStatus) -> Result<(), AppointmentError> {
        if current_status.is_terminal() {
            return Err(AppointmentError::TerminalState {
                status: *current_status,
            });
        }

        Ok(())
    }

    /// Form-level checks that must pass before any network call is issued.
    pub fn validate_submission(
        &self,
        request: &CreateAppointmentRequest,
        now: NaiveDateTime,
    ) -> Result<(), AppointmentError> {
        if request.patient_id.is_empty() {
            return Err(AppointmentError::ValidationError(
                "A patient must be selected".to_string(),
            ));
        }

        if request.patient_name.trim().is_empty() {
            return Err(AppointmentError::ValidationError(
                "Patient name is required".to_string(),
            ));
        }

        if request.date.and_time(request.time) < now {
            return Err(AppointmentError::ValidationError(
                "Cannot schedule an appointment in the past".to_string(),
            ));
        }

        Ok(())
    }

    /// A consultation can only be recorded as completed once its scheduled
    /// time has passed.
    pub fn validate_completion_time(
        &self,
        starts_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), AppointmentError> {
        if starts_at > now {
            return Err(AppointmentError::ValidationError(
                "Cannot mark a future appointment as completed".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
