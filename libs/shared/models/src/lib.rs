pub mod auth;
pub mod doctor;
pub mod error;
pub mod medical_record;
