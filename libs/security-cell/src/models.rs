use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecurityError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

impl From<argon2::password_hash::Error> for SecurityError {
    fn from(e: argon2::password_hash::Error) -> Self {
        SecurityError::Hashing(e.to_string())
    }
}
