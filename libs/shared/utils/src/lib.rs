pub mod extractor;
pub mod jwt;
pub mod test_utils;

pub use extractor::{require_verified, ApiJson, AuthGate, CurrentDoctor};
pub use jwt::{issue_token, verify_token, TokenError};
