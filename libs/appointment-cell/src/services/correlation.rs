use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use patient_cell::models::Patient;
use patient_cell::services::directory::{HttpPatientDirectory, PatientDirectory};
use shared_config::AppConfig;
use shared_models::ids::EntityId;

use crate::models::{Appointment, LastVisit};
use crate::services::store::{AppointmentStore, HttpAppointmentStore};

/// Filter the patient directory down to patients that appear as the
/// subject of at least one appointment. Directory order is preserved, so
/// repeated runs over the same inputs yield the same list.
pub fn patients_with_appointments(
    patients: &[Patient],
    appointments: &[Appointment],
) -> Vec<Patient> {
    let seen: HashSet<&EntityId> = appointments.iter().map(|a| &a.patient_id).collect();

    patients
        .iter()
        .filter(|p| seen.contains(&p.id))
        .cloned()
        .collect()
}

/// Most recent appointment for a patient. Later dates win; identical dates
/// fall back to the higher appointment id, so the projection is stable no
/// matter what order the store returned the records in.
pub fn last_appointment(patient_id: &EntityId, appointments: &[Appointment]) -> Option<LastVisit> {
    appointments
        .iter()
        .filter(|a| &a.patient_id == patient_id)
        .max_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)))
        .map(LastVisit::from)
}

/// Joins appointment records with patient identity across the two owning
/// services. Depends only on the read ports, so tests can feed it
/// in-memory fakes.
pub struct CorrelationService {
    patients: Arc<dyn PatientDirectory>,
    appointments: Arc<dyn AppointmentStore>,
}

impl CorrelationService {
    pub fn new(patients: Arc<dyn PatientDirectory>, appointments: Arc<dyn AppointmentStore>) -> Self {
        Self {
            patients,
            appointments,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(HttpPatientDirectory::new(config)),
            Arc::new(HttpAppointmentStore::new(config)),
        )
    }

    /// Patients eligible for invoicing: those who have actually been seen.
    ///
    /// The two fetches are independent in-flight requests; neither side may
    /// assume the other finished first, and either coming back empty simply
    /// shrinks the join.
    pub async fn billable_patients(&self) -> Vec<Patient> {
        let (patients, appointments) = tokio::join!(
            self.patients.list_patients(),
            self.appointments.list_appointments(),
        );

        let appointments = appointments.unwrap_or_else(|e| {
            warn!("Appointment store unavailable, no patients are billable: {}", e);
            Vec::new()
        });

        debug!(
            "Correlating {} patients against {} appointments",
            patients.len(),
            appointments.len()
        );

        patients_with_appointments(&patients, &appointments)
    }

    /// Last-visit projection for one patient. `None` means "no visit on
    /// record" - including when the store was unreachable, since an unknown
    /// history renders the same way.
    pub async fn last_visit(&self, patient_id: &EntityId) -> Option<LastVisit> {
        let appointments = match self.appointments.list_appointments().await {
            Ok(appointments) => appointments,
            Err(e) => {
                warn!("Appointment store unavailable, treating visit history as unknown: {}", e);
                return None;
            }
        };

        last_appointment(patient_id, &appointments)
    }
}
