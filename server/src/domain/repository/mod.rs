pub mod appointment_repository;
pub mod doctor_repository;
pub mod patient_repository;

pub use appointment_repository::AppointmentRepository;
pub use doctor_repository::DoctorRepository;
pub use patient_repository::PatientRepository;
