use serde::Deserialize;

use shared_models::medical_record::{DEFAULT_LIMIT, DEFAULT_PAGE};

pub const DEFAULT_GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthTokenRequest {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: Option<String>,
}

impl AuthTokenRequest {
    pub fn grant_type(&self) -> &str {
        self.grant_type
            .as_deref()
            .filter(|grant| !grant.is_empty())
            .unwrap_or(DEFAULT_GRANT_TYPE)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicineQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|parsed| *parsed >= 1)
        .unwrap_or(default)
}

impl MedicineQuery {
    pub fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}
