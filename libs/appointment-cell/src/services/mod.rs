pub mod correlation;
pub mod lifecycle;
pub mod store;

pub use correlation::CorrelationService;
pub use lifecycle::AppointmentLifecycleService;
pub use store::{AppointmentStore, HttpAppointmentStore};
