use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub jwt_secret: String,
    pub public_base_url: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
    pub satusehat_auth_url: String,
    pub satusehat_medicine_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            jwt_secret: String::new(),
            public_base_url: "http://localhost:8080".to_string(),
            supabase_url: String::new(),
            supabase_service_key: String::new(),
            mail_api_url: String::new(),
            mail_api_key: String::new(),
            mail_sender: "no-reply@localhost".to_string(),
            satusehat_auth_url: String::new(),
            satusehat_medicine_url: String::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or_else(|| {
                    warn!("SERVER_PORT not set or invalid, using {}", defaults.server_port);
                    defaults.server_port
                }),
            jwt_secret: env::var("SECRET_KEY")
                .unwrap_or_else(|_| {
                    warn!("SECRET_KEY not set, using empty value");
                    String::new()
                }),
            public_base_url: env::var("APP_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("APP_BASE_URL not set, using default");
                    defaults.public_base_url.clone()
                }),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            mail_api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| {
                    warn!("MAIL_API_URL not set, using empty value");
                    String::new()
                }),
            mail_api_key: env::var("MAIL_API_KEY").unwrap_or_default(),
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| defaults.mail_sender.clone()),
            satusehat_auth_url: env::var("AUTH_URL")
                .unwrap_or_else(|_| {
                    warn!("AUTH_URL not set, using empty value");
                    String::new()
                }),
            satusehat_medicine_url: env::var("MEDICINE_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDICINE_URL not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn is_database_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_service_key.is_empty()
    }

    pub fn is_mail_configured(&self) -> bool {
        !self.mail_api_url.is_empty()
    }

    /// Link embedded in the welcome email; visiting it marks the doctor verified.
    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify?token={}", self.public_base_url, token)
    }
}
