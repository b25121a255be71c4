pub mod directory;

pub use directory::{HttpPatientDirectory, PatientDirectory};
