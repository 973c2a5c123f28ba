use std::sync::Arc;

use axum::extract::FromRef;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use notification_cell::NotificationDispatcher;
use shared_config::AppConfig;
use shared_database::{DoctorDirectory, RecordStore};
use shared_models::medical_record::{MedicalRecord, DEFAULT_LIMIT, DEFAULT_PAGE};
use shared_utils::extractor::AuthGate;

#[derive(Clone)]
pub struct RecordState {
    pub config: Arc<AppConfig>,
    pub doctors: Arc<dyn DoctorDirectory>,
    pub records: Arc<dyn RecordStore>,
    pub notifications: NotificationDispatcher,
}

impl RecordState {
    pub fn new(
        config: Arc<AppConfig>,
        doctors: Arc<dyn DoctorDirectory>,
        records: Arc<dyn RecordStore>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            config,
            doctors,
            records,
            notifications,
        }
    }
}

impl FromRef<RecordState> for AuthGate {
    fn from_ref(state: &RecordState) -> Self {
        AuthGate::new(&state.config.jwt_secret, state.doctors.clone())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateRecordRequest {
    pub patient_name: String,
    pub birth_date: String,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub prescription: String,
    pub care_suggestion: String,
}

/// Partial edit. A missing or empty field leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateRecordRequest {
    pub patient_name: Option<String>,
    pub birth_date: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub care_suggestion: Option<String>,
}

/// Raw listing parameters. Values that are missing, unparsable or below 1
/// fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListRecordsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub searching: Option<String>,
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|parsed| *parsed >= 1)
        .unwrap_or(default)
}

impl ListRecordsQuery {
    pub fn page(&self) -> u32 {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u32 {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

/// Record as returned after an edit; the owner is implied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: i64,
    pub patient_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub prescription: String,
    pub care_suggestion: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MedicalRecord> for RecordSummary {
    fn from(record: MedicalRecord) -> Self {
        Self {
            id: record.id,
            patient_name: record.patient_name,
            birth_date: record.birth_date,
            email: record.email,
            phone_number: record.phone_number,
            diagnosis: record.diagnosis,
            prescription: record.prescription,
            care_suggestion: record.care_suggestion,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
