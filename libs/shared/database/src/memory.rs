use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::doctor::{Doctor, NewDoctor};
use shared_models::medical_record::{MedicalRecord, NewMedicalRecord, RecordPage, RecordQuery};

use crate::error::StoreError;
use crate::repository::{DoctorDirectory, RecordStore};

#[derive(Default)]
struct DoctorTable {
    rows: BTreeMap<i64, Doctor>,
    last_id: i64,
}

/// Process-local doctor directory. Used when no database is configured and in tests.
#[derive(Default)]
pub struct InMemoryDoctorDirectory {
    table: RwLock<DoctorTable>,
}

impl InMemoryDoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_by<F>(&self, predicate: F) -> Option<Doctor>
    where
        F: Fn(&Doctor) -> bool,
    {
        let table = self.table.read().await;
        table.rows.values().find(|doctor| predicate(doctor)).cloned()
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryDoctorDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(self.find_by(|doctor| doctor.username == username).await)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(self.find_by(|doctor| doctor.email == email).await)
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<Doctor>, StoreError> {
        if token.is_empty() {
            return Ok(None);
        }
        Ok(self
            .find_by(|doctor| doctor.verification_token.as_deref() == Some(token))
            .await)
    }

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|row| row.username == doctor.username) {
            return Err(StoreError::UniqueViolation("username".to_string()));
        }
        if table.rows.values().any(|row| row.email == doctor.email) {
            return Err(StoreError::UniqueViolation("email".to_string()));
        }

        table.last_id += 1;
        let id = table.last_id;
        let doctor = doctor.into_doctor(id);
        table.rows.insert(id, doctor.clone());

        debug!("Inserted doctor {} with id {}", doctor.username, id);
        Ok(doctor)
    }

    async fn mark_verified(&self, id: i64) -> Result<Doctor, StoreError> {
        let mut table = self.table.write().await;
        let doctor = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        doctor.is_verified = true;
        doctor.verification_token = None;

        Ok(doctor.clone())
    }
}

#[derive(Default)]
struct RecordTable {
    rows: BTreeMap<i64, MedicalRecord>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    table: RwLock<RecordTable>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn insert(&self, record: NewMedicalRecord) -> Result<MedicalRecord, StoreError> {
        let mut table = self.table.write().await;

        table.last_id += 1;
        let id = table.last_id;
        let record = record.into_record(id, Utc::now());
        table.rows.insert(id, record.clone());

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<MedicalRecord>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_by_doctor(&self, query: &RecordQuery) -> Result<RecordPage, StoreError> {
        let table = self.table.read().await;

        let matching: Vec<&MedicalRecord> = table
            .rows
            .values()
            .rev()
            .filter(|record| record.doctor_id == query.doctor_id)
            .filter(|record| {
                query
                    .search
                    .as_deref()
                    .map_or(true, |term| record.matches_search(term))
            })
            .collect();

        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(RecordPage { records, total })
    }

    async fn update(&self, record: &MedicalRecord) -> Result<MedicalRecord, StoreError> {
        let mut table = self.table.write().await;
        let stored = table.rows.get_mut(&record.id).ok_or(StoreError::NotFound)?;

        stored.patient_name = record.patient_name.clone();
        stored.birth_date = record.birth_date;
        stored.email = record.email.clone();
        stored.phone_number = record.phone_number.clone();
        stored.diagnosis = record.diagnosis.clone();
        stored.prescription = record.prescription.clone();
        stored.care_suggestion = record.care_suggestion.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn new_doctor(username: &str, email: &str) -> NewDoctor {
        NewDoctor {
            first_name: "Test".to_string(),
            last_name: "Doctor".to_string(),
            full_name: "Test Doctor".to_string(),
            contact_number: "081234567890".to_string(),
            gender: "female".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            is_verified: false,
            verification_token: Some(format!("token-{}", username)),
        }
    }

    fn new_record(doctor_id: i64, patient_name: &str) -> NewMedicalRecord {
        NewMedicalRecord {
            patient_name: patient_name.to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 2, 14).unwrap(),
            email: format!("{}@example.com", patient_name.to_lowercase().replace(' ', ".")),
            phone_number: "081234567890".to_string(),
            diagnosis: "Hypertension".to_string(),
            prescription: "Amlodipine 5mg".to_string(),
            care_suggestion: "Reduce salt".to_string(),
            doctor_id,
        }
    }

    #[tokio::test]
    async fn test_insert_enforces_uniqueness() {
        let directory = InMemoryDoctorDirectory::new();
        let first = directory.insert(new_doctor("drhouse", "house@example.com")).await.unwrap();
        assert_eq!(first.id, 1);

        let duplicate_username = directory.insert(new_doctor("drhouse", "other@example.com")).await;
        assert_matches!(duplicate_username, Err(StoreError::UniqueViolation(field)) if field == "username");

        let duplicate_email = directory.insert(new_doctor("drwilson", "house@example.com")).await;
        assert_matches!(duplicate_email, Err(StoreError::UniqueViolation(field)) if field == "email");
    }

    #[tokio::test]
    async fn test_mark_verified_clears_token() {
        let directory = InMemoryDoctorDirectory::new();
        let doctor = directory.insert(new_doctor("drgrey", "grey@example.com")).await.unwrap();

        let found = directory.find_by_verification_token("token-drgrey").await.unwrap();
        assert_eq!(found.map(|d| d.id), Some(doctor.id));

        let verified = directory.mark_verified(doctor.id).await.unwrap();
        assert!(verified.is_verified);
        assert_eq!(verified.verification_token, None);

        assert!(directory.find_by_verification_token("token-drgrey").await.unwrap().is_none());
        assert!(directory.find_by_verification_token("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_paged_and_newest_first() {
        let store = InMemoryRecordStore::new();
        for i in 1..=15 {
            store.insert(new_record(1, &format!("Patient {}", i))).await.unwrap();
        }
        store.insert(new_record(2, "Someone Else")).await.unwrap();

        let page = store.list_by_doctor(&RecordQuery::new(1, 2, 10, None)).await.unwrap();
        assert_eq!(page.total, 15);
        assert_eq!(page.records.len(), 5);
        assert_eq!(page.records.first().map(|r| r.patient_name.as_str()), Some("Patient 5"));
        assert_eq!(page.records.last().map(|r| r.patient_name.as_str()), Some("Patient 1"));
        assert!(page.records.iter().all(|r| r.doctor_id == 1));
    }

    #[tokio::test]
    async fn test_list_search_filters_total() {
        let store = InMemoryRecordStore::new();
        store.insert(new_record(1, "Siti Aminah")).await.unwrap();
        store.insert(new_record(1, "Budi Santoso")).await.unwrap();

        let page = store
            .list_by_doctor(&RecordQuery::new(1, 1, 10, Some("SITI".to_string())))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].patient_name, "Siti Aminah");
    }

    #[tokio::test]
    async fn test_update_keeps_owner_and_delete_is_permanent() {
        let store = InMemoryRecordStore::new();
        let mut record = store.insert(new_record(1, "Siti Aminah")).await.unwrap();

        record.diagnosis = "Migraine".to_string();
        record.doctor_id = 99;
        let updated = store.update(&record).await.unwrap();
        assert_eq!(updated.diagnosis, "Migraine");
        assert_eq!(updated.doctor_id, 1);

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.find_by_id(record.id).await.unwrap().is_none());
    }
}
