// =====================================================================================
// SECURITY CELL - CREDENTIALS & INPUT RULES
// =====================================================================================
//
// Password hashing, verification tokens, and the field rules shared by the
// doctor signup flow and the medical record endpoints.
//
// =====================================================================================

pub mod models;
pub mod services;

pub use models::SecurityError;
pub use services::{PasswordSecurityService, ValidationService};
