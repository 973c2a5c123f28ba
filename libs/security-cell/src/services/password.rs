// =====================================================================================
// PASSWORD SECURITY SERVICE - HASHING & VERIFICATION TOKENS
// =====================================================================================

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use tracing::{debug, instrument};

use crate::models::SecurityError;

const VERIFICATION_TOKEN_BYTES: usize = 32;

pub struct PasswordSecurityService;

impl PasswordSecurityService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, SecurityError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on a mismatch; `Err` only when the stored hash can't be parsed.
    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| SecurityError::MalformedHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 32 random bytes, URL-safe base64 without padding.
    pub fn generate_verification_token() -> String {
        let mut bytes = [0u8; VERIFICATION_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
