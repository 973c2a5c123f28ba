use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A store-level unique constraint rejected the write. Carries the column name.
    #[error("{0} already exists")]
    UniqueViolation(String),

    #[error("Row not found")]
    NotFound,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(field) => {
                AppError::Conflict(format!("{} already exists", capitalize(&field)))
            }
            StoreError::NotFound => AppError::NotFound("Record not found".to_string()),
            other => {
                tracing::error!("Store operation failed: {}", other);
                AppError::Database("Database operation failed".to_string())
            }
        }
    }
}
