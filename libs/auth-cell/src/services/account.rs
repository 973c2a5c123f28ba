use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use notification_cell::NotificationDispatcher;
use security_cell::{PasswordSecurityService, ValidationService};
use shared_config::AppConfig;
use shared_database::DoctorDirectory;
use shared_models::auth::AuthError;
use shared_models::doctor::{Doctor, NewDoctor};
use shared_models::error::AppError;
use shared_utils::jwt::issue_token;

use crate::models::{AuthState, SigninRequest, SignupRequest};

const INVALID_VERIFICATION_TOKEN: &str = "Invalid verification token";

/// Signup, signin and email verification for doctor accounts.
pub struct AccountService {
    config: Arc<AppConfig>,
    doctors: Arc<dyn DoctorDirectory>,
    notifications: NotificationDispatcher,
}

impl AccountService {
    pub fn new(state: &AuthState) -> Self {
        Self {
            config: state.config.clone(),
            doctors: state.doctors.clone(),
            notifications: state.notifications.clone(),
        }
    }

    /// Field rules in order; the first failing rule decides the message.
    pub fn validate_signup(request: &SignupRequest) -> Result<(), AppError> {
        let rules: [(bool, &str); 6] = [
            (
                ValidationService::is_valid_name(&request.first_name, 1, 100),
                "First Name must be between 1 and 100 characters and contain only letters",
            ),
            (
                request.last_name.is_empty()
                    || ValidationService::is_valid_name(&request.last_name, 1, 100),
                "Last Name max 100 characters and contain only letters",
            ),
            (
                ValidationService::is_valid_username(&request.username),
                "Username must be at least 5 characters and max 100 characters",
            ),
            (
                ValidationService::is_valid_password(&request.password),
                "Password must be at least 8 characters max 100 characters and contain a combination of letters and numbers",
            ),
            (ValidationService::is_valid_email(&request.email), "Invalid email format"),
            (
                ValidationService::is_valid_contact_number(&request.contact_number),
                "Contact number must be between 10 and 13 digits and contain only numbers",
            ),
        ];

        match rules.iter().find(|(passed, _)| !passed) {
            Some((_, message)) => Err(AppError::ValidationError(message.to_string())),
            None => Ok(()),
        }
    }

    /// Registers an unverified doctor and queues the welcome email.
    /// Returns the new account and a bearer token for it.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> Result<(Doctor, String), AppError> {
        Self::validate_signup(&request)?;

        match self.doctors.find_by_username(&request.username).await {
            Ok(Some(_)) => return Err(AppError::Conflict("Username already exists".to_string())),
            Ok(None) => {}
            Err(e) => {
                error!("Username lookup failed: {}", e);
                return Err(AppError::Database("Failed to check username".to_string()));
            }
        }

        match self.doctors.find_by_email(&request.email).await {
            Ok(Some(_)) => return Err(AppError::Conflict("Email already exists".to_string())),
            Ok(None) => {}
            Err(e) => {
                error!("Email lookup failed: {}", e);
                return Err(AppError::Database("Failed to check email".to_string()));
            }
        }

        let password_hash = PasswordSecurityService::hash_password(&request.password).map_err(|e| {
            error!("{}", e);
            AppError::Internal("Failed to hash password".to_string())
        })?;
        let verification_token = PasswordSecurityService::generate_verification_token();

        let doctor = self
            .doctors
            .insert(NewDoctor {
                full_name: NewDoctor::full_name(&request.first_name, &request.last_name),
                first_name: request.first_name,
                last_name: request.last_name,
                contact_number: request.contact_number,
                gender: request.gender,
                email: request.email,
                username: request.username,
                password_hash,
                is_verified: false,
                verification_token: Some(verification_token.clone()),
            })
            .await?;

        let token = self.issue(&doctor)?;

        self.notifications
            .send_verification(&doctor.email, &doctor.full_name, &verification_token);

        info!("Registered doctor {} ({})", doctor.username, doctor.id);
        Ok((doctor, token))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signin(&self, request: SigninRequest) -> Result<(Doctor, String), AppError> {
        if request.username.is_empty() {
            return Err(AppError::BadRequest("Username is required".to_string()));
        }
        if request.password.is_empty() {
            return Err(AppError::BadRequest("Password is required".to_string()));
        }

        let doctor = self
            .doctors
            .find_by_username(&request.username)
            .await
            .map_err(|e| {
                error!("Username lookup failed: {}", e);
                AppError::Database("Failed to check username".to_string())
            })?
            .ok_or_else(|| AppError::Auth("Invalid username".to_string()))?;

        let matches = PasswordSecurityService::verify_password(&request.password, &doctor.password_hash)
            .map_err(|e| {
                error!("Stored credential for {} is unusable: {}", doctor.username, e);
                AppError::Internal("Failed to verify password".to_string())
            })?;
        if !matches {
            return Err(AppError::Auth("Invalid password".to_string()));
        }

        if !doctor.is_verified {
            return Err(AuthError::Unverified.into());
        }

        let token = self.issue(&doctor)?;
        self.notifications.send_login_alert(&doctor.email, &doctor.full_name);

        debug!("Doctor {} signed in", doctor.id);
        Ok((doctor, token))
    }

    /// Redeems a one-time verification token.
    #[instrument(skip(self, token))]
    pub async fn verify(&self, token: Option<&str>) -> Result<Doctor, AppError> {
        let token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Auth(INVALID_VERIFICATION_TOKEN.to_string()))?;

        let doctor = self
            .doctors
            .find_by_verification_token(token)
            .await
            .map_err(|e| {
                error!("Verification token lookup failed: {}", e);
                AppError::Database("Failed to verify account".to_string())
            })?
            .ok_or_else(|| AppError::Auth(INVALID_VERIFICATION_TOKEN.to_string()))?;

        let doctor = self.doctors.mark_verified(doctor.id).await?;

        info!("Doctor {} verified their email", doctor.id);
        Ok(doctor)
    }

    fn issue(&self, doctor: &Doctor) -> Result<String, AppError> {
        issue_token(&doctor.username, &self.config.jwt_secret).map_err(|e| {
            error!("Failed to issue token for {}: {}", doctor.username, e);
            AppError::Internal("Failed to generate token".to_string())
        })
    }
}
