use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub patient_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub prescription: String,
    pub care_suggestion: String,
    pub doctor_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    /// Case-insensitive substring match on patient name or email.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.patient_name.to_lowercase().contains(&term) || self.email.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMedicalRecord {
    pub patient_name: String,
    pub birth_date: NaiveDate,
    pub email: String,
    pub phone_number: String,
    pub diagnosis: String,
    pub prescription: String,
    pub care_suggestion: String,
    pub doctor_id: i64,
}

impl NewMedicalRecord {
    pub fn into_record(self, id: i64, now: DateTime<Utc>) -> MedicalRecord {
        MedicalRecord {
            id,
            patient_name: self.patient_name,
            birth_date: self.birth_date,
            email: self.email,
            phone_number: self.phone_number,
            diagnosis: self.diagnosis,
            prescription: self.prescription,
            care_suggestion: self.care_suggestion,
            doctor_id: self.doctor_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Doctor-scoped listing request. `page` and `limit` are always >= 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordQuery {
    pub doctor_id: i64,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl RecordQuery {
    pub fn new(doctor_id: i64, page: u32, limit: u32, search: Option<String>) -> Self {
        Self {
            doctor_id,
            search: search
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty()),
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    pub records: Vec<MedicalRecord>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_clamps_and_offsets() {
        let query = RecordQuery::new(1, 0, 0, Some("   ".to_string()));
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 1);
        assert_eq!(query.search, None);
        assert_eq!(query.offset(), 0);

        let query = RecordQuery::new(1, 3, 10, Some(" siti ".to_string()));
        assert_eq!(query.offset(), 20);
        assert_eq!(query.search.as_deref(), Some("siti"));
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let now = Utc::now();
        let record = NewMedicalRecord {
            patient_name: "Siti Nurhaliza".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            email: "siti@Example.com".to_string(),
            phone_number: "081234567890".to_string(),
            diagnosis: "Flu".to_string(),
            prescription: "Rest".to_string(),
            care_suggestion: "Drink water".to_string(),
            doctor_id: 1,
        }
        .into_record(1, now);

        assert!(record.matches_search("NURHAL"));
        assert!(record.matches_search("example.COM"));
        assert!(!record.matches_search("budi"));
    }
}
