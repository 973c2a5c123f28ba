use async_trait::async_trait;

use shared_models::doctor::{Doctor, NewDoctor};
use shared_models::medical_record::{MedicalRecord, NewMedicalRecord, RecordPage, RecordQuery};

use crate::error::StoreError;

/// Lookup and insertion of doctor accounts.
///
/// Implementations must enforce username and email uniqueness on `insert`
/// and report a collision as [`StoreError::UniqueViolation`]. Callers may
/// pre-check with the `find_by_*` methods, but the insert is the real guard.
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Doctor>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Doctor>, StoreError>;

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<Doctor>, StoreError>;

    async fn insert(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    /// Sets `is_verified` and clears the verification token.
    async fn mark_verified(&self, id: i64) -> Result<Doctor, StoreError>;
}

/// Persistence for medical records. Ownership checks are the caller's job.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: NewMedicalRecord) -> Result<MedicalRecord, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<MedicalRecord>, StoreError>;

    /// Most-recent-first page of a doctor's records plus the filtered total.
    async fn list_by_doctor(&self, query: &RecordQuery) -> Result<RecordPage, StoreError>;

    /// Overwrites the mutable fields of an existing record. `doctor_id` and
    /// `created_at` are never changed.
    async fn update(&self, record: &MedicalRecord) -> Result<MedicalRecord, StoreError>;

    /// Returns `false` when no row had that id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
