use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("JWT secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Invalid claims format")]
    InvalidClaims,

    #[error("Token expired")]
    Expired,
}

fn signer(secret: &str) -> Result<HmacSha256, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)
}

/// Signs arbitrary claims as a compact HS256 token.
pub fn encode_claims(claims: &JwtClaims, secret: &str) -> Result<String, TokenError> {
    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };

    let header_json = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?;
    let claims_json = serde_json::to_vec(claims).map_err(|_| TokenError::InvalidClaims)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );

    let mut mac = signer(secret)?;
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    Ok(format!("{}.{}", signing_input, signature))
}

/// Issues the session token handed out on signup and signin. Tokens carry
/// the username and issue time only; they do not expire.
pub fn issue_token(subject: &str, secret: &str) -> Result<String, TokenError> {
    let claims = JwtClaims {
        sub: subject.to_string(),
        iat: Some(Utc::now().timestamp() as u64),
        exp: None,
    };
    encode_claims(&claims, secret)
}

pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, TokenError> {
    let mut mac = signer(secret)?;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }
    let (header_b64, claims_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let header: JwtHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(TokenError::Malformed)?;
    if header.alg != ALGORITHM {
        debug!("Rejecting token signed with {}", header.alg);
        return Err(TokenError::Malformed);
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        debug!("Failed to decode signature: {}", e);
        TokenError::InvalidSignature
    })?;

    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());
    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::InvalidSignature);
    }

    let claims: JwtClaims = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .ok_or(TokenError::InvalidClaims)?;

    if claims.sub.is_empty() {
        return Err(TokenError::InvalidClaims);
    }

    if let Some(exp) = claims.exp {
        let now = Utc::now().timestamp() as u64;
        if exp < now {
            debug!("Token expired at {} (now: {})", exp, now);
            return Err(TokenError::Expired);
        }
    }

    Ok(claims)
}
