use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument};

use notification_cell::NotificationDispatcher;
use security_cell::ValidationService;
use shared_database::RecordStore;
use shared_models::doctor::Doctor;
use shared_models::error::AppError;
use shared_models::medical_record::{MedicalRecord, NewMedicalRecord, RecordPage, RecordQuery};

use crate::models::{CreateRecordRequest, ListRecordsQuery, RecordState, UpdateRecordRequest};

const TEXT_MIN: usize = 1;
const TEXT_MAX: usize = 3000;

fn invalid(message: &str) -> AppError {
    AppError::ValidationError(message.to_string())
}

fn check_patient_name(value: &str) -> Result<(), AppError> {
    if ValidationService::is_valid_name(value, 1, 100) {
        Ok(())
    } else {
        Err(invalid(
            "Patient name must be between 1 and 100 characters and contain only letters and spaces",
        ))
    }
}

fn check_birth_date(value: &str) -> Result<NaiveDate, AppError> {
    ValidationService::parse_date(value)
        .ok_or_else(|| invalid("Birth date must be in the format yyyy-mm-dd"))
}

fn check_email(value: &str) -> Result<(), AppError> {
    if ValidationService::is_valid_email(value) {
        Ok(())
    } else {
        Err(invalid("Invalid email format"))
    }
}

fn check_phone_number(value: &str) -> Result<(), AppError> {
    if ValidationService::is_valid_phone_number(value) {
        Ok(())
    } else {
        Err(invalid(
            "Phone number must contain only digits and be at most 13 characters long",
        ))
    }
}

fn check_text(label: &str, value: &str) -> Result<(), AppError> {
    if ValidationService::is_within_length(value, TEXT_MIN, TEXT_MAX) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "{} must be between {} and {} characters",
            label, TEXT_MIN, TEXT_MAX
        )))
    }
}

/// A present, non-empty edit value.
fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Medical record operations on behalf of an authenticated doctor. Every
/// lookup by id checks ownership before anything else happens.
pub struct MedicalRecordService {
    records: Arc<dyn RecordStore>,
    notifications: NotificationDispatcher,
}

impl MedicalRecordService {
    pub fn new(state: &RecordState) -> Self {
        Self {
            records: state.records.clone(),
            notifications: state.notifications.clone(),
        }
    }

    pub fn validate_create(request: &CreateRecordRequest) -> Result<NaiveDate, AppError> {
        check_patient_name(&request.patient_name)?;
        let birth_date = check_birth_date(&request.birth_date)?;
        check_email(&request.email)?;
        check_phone_number(&request.phone_number)?;
        check_text("Diagnosis", &request.diagnosis)?;
        check_text("Prescription", &request.prescription)?;
        check_text("Care suggestion", &request.care_suggestion)?;
        Ok(birth_date)
    }

    #[instrument(skip(self, doctor, request), fields(doctor_id = doctor.id))]
    pub async fn create(
        &self,
        doctor: &Doctor,
        request: CreateRecordRequest,
    ) -> Result<MedicalRecord, AppError> {
        let birth_date = Self::validate_create(&request)?;

        let record = self
            .records
            .insert(NewMedicalRecord {
                patient_name: request.patient_name,
                birth_date,
                email: request.email,
                phone_number: request.phone_number,
                diagnosis: request.diagnosis,
                prescription: request.prescription,
                care_suggestion: request.care_suggestion,
                doctor_id: doctor.id,
            })
            .await?;

        self.notifications.send_record_copy(
            &record.email,
            &record.patient_name,
            &record.diagnosis,
            &record.prescription,
            &record.care_suggestion,
        );

        info!("Created medical record {}", record.id);
        Ok(record)
    }

    pub async fn list(&self, doctor: &Doctor, query: &ListRecordsQuery) -> Result<RecordPage, AppError> {
        let query = RecordQuery::new(doctor.id, query.page(), query.limit(), query.searching.clone());
        debug!(
            "Listing records for doctor {} (page {}, limit {}, search {:?})",
            doctor.id, query.page, query.limit, query.search
        );

        Ok(self.records.list_by_doctor(&query).await?)
    }

    /// Loads a record and checks it belongs to `doctor`. `action` names the
    /// operation in the 403 message.
    async fn owned(&self, doctor: &Doctor, id: i64, action: &str) -> Result<MedicalRecord, AppError> {
        let record = self
            .records
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Medical record not found".to_string()))?;

        if record.doctor_id != doctor.id {
            debug!("Doctor {} denied {} on record {}", doctor.id, action, id);
            return Err(AppError::Forbidden(format!(
                "You are not authorized to {} this medical record",
                action
            )));
        }

        Ok(record)
    }

    pub async fn get(&self, doctor: &Doctor, id: i64) -> Result<MedicalRecord, AppError> {
        self.owned(doctor, id, "view").await
    }

    /// Applies each provided field after validating it. Fields left out keep
    /// their stored value; the owner never changes.
    #[instrument(skip(self, doctor, request), fields(doctor_id = doctor.id))]
    pub async fn update(
        &self,
        doctor: &Doctor,
        id: i64,
        request: UpdateRecordRequest,
    ) -> Result<MedicalRecord, AppError> {
        let mut record = self.owned(doctor, id, "edit").await?;

        if let Some(value) = provided(&request.patient_name) {
            check_patient_name(value)?;
            record.patient_name = value.to_string();
        }
        if let Some(value) = provided(&request.birth_date) {
            record.birth_date = check_birth_date(value)?;
        }
        if let Some(value) = provided(&request.email) {
            check_email(value)?;
            record.email = value.to_string();
        }
        if let Some(value) = provided(&request.phone_number) {
            check_phone_number(value)?;
            record.phone_number = value.to_string();
        }
        if let Some(value) = provided(&request.diagnosis) {
            check_text("Diagnosis", value)?;
            record.diagnosis = value.to_string();
        }
        if let Some(value) = provided(&request.prescription) {
            check_text("Prescription", value)?;
            record.prescription = value.to_string();
        }
        if let Some(value) = provided(&request.care_suggestion) {
            check_text("Care suggestion", value)?;
            record.care_suggestion = value.to_string();
        }

        let updated = self.records.update(&record).await?;
        info!("Updated medical record {}", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, doctor: &Doctor, id: i64) -> Result<(), AppError> {
        let record = self.owned(doctor, id, "delete").await?;

        if !self.records.delete(record.id).await? {
            return Err(AppError::NotFound("Medical record not found".to_string()));
        }

        info!("Deleted medical record {}", record.id);
        Ok(())
    }
}
