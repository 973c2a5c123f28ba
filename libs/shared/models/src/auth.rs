use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Bearer token claims. The subject is the doctor's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Failures of the Authorization Gate. Each case keeps its own message so
/// clients relying on the historical wording still see it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization token is missing")]
    MissingHeader,

    #[error("Invalid token format")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Doctor not found")]
    UnknownSubject,

    #[error("Account not verified. Please verify your account before logging in.")]
    Unverified,

    #[error("Failed to resolve doctor: {0}")]
    Lookup(String),
}
