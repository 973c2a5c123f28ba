use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::doctor::{Doctor, NewDoctor};
use shared_models::medical_record::{MedicalRecord, NewMedicalRecord, RecordPage, RecordQuery};

use crate::error::StoreError;
use crate::repository::{DoctorDirectory, RecordStore};
use crate::supabase::SupabaseClient;

const DOCTORS: &str = "/rest/v1/doctors";
const MEDICAL_RECORDS: &str = "/rest/v1/medical_records";

fn return_representation() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

fn first_row<T>(rows: Vec<T>, what: &str) -> Result<T, StoreError> {
    rows.into_iter().next().ok_or_else(|| StoreError::Api {
        status: 500,
        message: format!("{} returned no rows", what),
    })
}

/// Doctor directory backed by the `doctors` table. Username and email carry
/// unique constraints in the schema.
pub struct SupabaseDoctorDirectory {
    supabase: SupabaseClient,
}

impl SupabaseDoctorDirectory {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Doctor>, StoreError> {
        let path = format!(
            "{}?{}=eq.{}&limit=1",
            DOCTORS,
            column,
            urlencoding::encode(value)
        );
        let rows: Vec<Doctor> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseDoctorDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        self.find_one("id", &id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Doctor>, StoreError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError> {
        self.find_one("email", email).await
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<Doctor>, StoreError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.find_one("verification_token", token).await
    }

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        debug!("Inserting doctor account: {}", doctor.username);

        let rows: Vec<Doctor> = self
            .supabase
            .request_with_headers(
                Method::POST,
                DOCTORS,
                Some(serde_json::to_value(&doctor)?),
                Some(return_representation()),
            )
            .await?;

        first_row(rows, "doctor insert")
    }

    async fn mark_verified(&self, id: i64) -> Result<Doctor, StoreError> {
        let path = format!("{}?id=eq.{}", DOCTORS, id);
        let rows: Vec<Doctor> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({
                    "is_verified": true,
                    "verification_token": null
                })),
                Some(return_representation()),
            )
            .await?;

        rows.into_iter().next().ok_or(StoreError::NotFound)
    }
}

/// Record store backed by the `medical_records` table.
pub struct SupabaseRecordStore {
    supabase: SupabaseClient,
}

impl SupabaseRecordStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }
}

/// PostgREST `or` filter over patient name and email. Quotes and backslashes
/// are dropped so the term cannot break out of the quoted value.
fn search_filter(term: &str) -> String {
    let cleaned: String = term.chars().filter(|c| *c != '"' && *c != '\\').collect();
    let expression = format!(
        "(patient_name.ilike.\"*{0}*\",email.ilike.\"*{0}*\")",
        cleaned
    );
    format!("&or={}", urlencoding::encode(&expression))
}

#[async_trait]
impl RecordStore for SupabaseRecordStore {
    async fn insert(&self, record: NewMedicalRecord) -> Result<MedicalRecord, StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut body = serde_json::to_value(&record)?;
        if let Value::Object(fields) = &mut body {
            fields.insert("created_at".to_string(), json!(now));
            fields.insert("updated_at".to_string(), json!(now));
        }

        let rows: Vec<MedicalRecord> = self
            .supabase
            .request_with_headers(Method::POST, MEDICAL_RECORDS, Some(body), Some(return_representation()))
            .await?;

        first_row(rows, "medical record insert")
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MedicalRecord>, StoreError> {
        let path = format!("{}?id=eq.{}&limit=1", MEDICAL_RECORDS, id);
        let rows: Vec<MedicalRecord> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_by_doctor(&self, query: &RecordQuery) -> Result<RecordPage, StoreError> {
        let mut path = format!(
            "{}?doctor_id=eq.{}&order=id.desc&limit={}&offset={}",
            MEDICAL_RECORDS,
            query.doctor_id,
            query.limit,
            query.offset()
        );
        if let Some(term) = query.search.as_deref() {
            path.push_str(&search_filter(term));
        }

        let (records, total): (Vec<MedicalRecord>, Option<u64>) =
            self.supabase.request_with_count(&path).await?;
        let total = total.unwrap_or(records.len() as u64);

        Ok(RecordPage { records, total })
    }

    async fn update(&self, record: &MedicalRecord) -> Result<MedicalRecord, StoreError> {
        let path = format!("{}?id=eq.{}", MEDICAL_RECORDS, record.id);
        let rows: Vec<MedicalRecord> = self
            .supabase
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({
                    "patient_name": record.patient_name,
                    "birth_date": record.birth_date,
                    "email": record.email,
                    "phone_number": record.phone_number,
                    "diagnosis": record.diagnosis,
                    "prescription": record.prescription,
                    "care_suggestion": record.care_suggestion,
                    "updated_at": Utc::now().to_rfc3339()
                })),
                Some(return_representation()),
            )
            .await?;

        rows.into_iter().next().ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let path = format!("{}?id=eq.{}", MEDICAL_RECORDS, id);
        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(Method::DELETE, &path, None, Some(return_representation()))
            .await?;

        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_filter_is_encoded_and_quoted() {
        let filter = search_filter("Siti \"x\"");
        assert!(filter.starts_with("&or="));
        assert!(!filter.contains(' '));
        assert!(!filter.contains("%5C"));

        let decoded = urlencoding::decode(&filter[4..]).unwrap();
        assert_eq!(
            decoded,
            "(patient_name.ilike.\"*Siti x*\",email.ilike.\"*Siti x*\")"
        );
    }
}
