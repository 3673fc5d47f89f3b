pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ClientError};
pub use model::{
    Appointment, AppointmentData, AuthSession, Doctor, DoctorData, Envelope, Patient, PatientData,
};
pub use session::{MemorySession, SessionStore};

#[cfg(feature = "mock")]
pub use session::MockSessionStore;
