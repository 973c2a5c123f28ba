use std::sync::Arc;

use serde::{Deserialize, Serialize};

use notification_cell::NotificationDispatcher;
use shared_config::AppConfig;
use shared_database::DoctorDirectory;

/// Everything the account endpoints need, injected at startup.
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AppConfig>,
    pub doctors: Arc<dyn DoctorDirectory>,
    pub notifications: NotificationDispatcher,
}

impl AuthState {
    pub fn new(
        config: Arc<AppConfig>,
        doctors: Arc<dyn DoctorDirectory>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            config,
            doctors,
            notifications,
        }
    }
}

/// Missing fields bind as empty strings so the field rules report them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub gender: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub code: u16,
    pub error: bool,
    pub message: String,
    pub token: String,
    pub id: i64,
}

impl AuthResponse {
    pub fn ok(message: &str, token: String, id: i64) -> Self {
        Self {
            code: 200,
            error: false,
            message: message.to_string(),
            token,
            id,
        }
    }
}
