use std::sync::Arc;

use chrono::{Duration, Utc};

use shared_config::AppConfig;
use shared_database::DoctorDirectory;
use shared_models::auth::JwtClaims;
use shared_models::doctor::{Doctor, NewDoctor};

use crate::jwt::encode_claims;

pub struct TestConfig {
    pub jwt_secret: String,
    pub public_base_url: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl TestConfig {
    /// Config with no database or mail provider, so stores stay in memory.
    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            jwt_secret: self.jwt_secret.clone(),
            public_base_url: self.public_base_url.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Builder for doctor rows seeded straight into a directory.
pub struct TestDoctor {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
}

impl TestDoctor {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: "not-a-real-hash".to_string(),
            is_verified: false,
            verification_token: Some(format!("verify-{}", username)),
        }
    }

    pub fn verified(username: &str) -> Self {
        Self {
            is_verified: true,
            verification_token: None,
            ..Self::new(username)
        }
    }

    pub fn unverified(username: &str) -> Self {
        Self::new(username)
    }

    pub fn with_password_hash(mut self, hash: &str) -> Self {
        self.password_hash = hash.to_string();
        self
    }

    pub fn to_new_doctor(&self) -> NewDoctor {
        NewDoctor {
            first_name: "Test".to_string(),
            last_name: "Doctor".to_string(),
            full_name: NewDoctor::full_name("Test", "Doctor"),
            contact_number: "081234567890".to_string(),
            gender: "female".to_string(),
            email: self.email.clone(),
            username: self.username.clone(),
            password_hash: self.password_hash.clone(),
            is_verified: self.is_verified,
            verification_token: self.verification_token.clone(),
        }
    }

    pub async fn insert_into(&self, directory: &dyn DoctorDirectory) -> Doctor {
        directory
            .insert(self.to_new_doctor())
            .await
            .expect("seed doctor should insert")
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(subject: &str, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            iat: Some(now.timestamp() as u64),
            exp: exp_hours.map(|hours| (now + Duration::hours(hours)).timestamp().max(0) as u64),
        };

        encode_claims(&claims, secret).expect("test token should encode")
    }

    pub fn create_expired_token(subject: &str, secret: &str) -> String {
        Self::create_test_token(subject, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(subject: &str) -> String {
        Self::create_test_token(subject, "wrong-secret", None)
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}
