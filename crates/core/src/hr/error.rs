use thiserror::Error;

use crate::storage::{repository_error_to_status_code, RepositoryError};

/// Errors raised while validating request payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid employee ID '{0}': expected 3-50 characters of A-Z, 0-9 or '-'")]
    InvalidEmployeeId(String),
    #[error("{field} must be between {min} and {max} characters")]
    InvalidLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
    #[error("Attendance cannot be marked for future dates")]
    FutureDate,
    #[error("Notes too long (max 500 characters)")]
    NotesTooLong,
}

/// Errors surfaced by the record services.
///
/// Cache failures never appear here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity} with ID '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("Invalid record ID format: {0}")]
    InvalidId(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn employee_not_found(employee_id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: "Employee",
            id: employee_id.into(),
        }
    }

    pub fn attendance_not_found(record_id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity: "Attendance record",
            id: record_id.into(),
        }
    }
}

/// Maps a [`ServiceError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `Conflict` -> 409
/// - `InvalidId` -> 400
/// - `Validation` -> 422
/// - `Repository` -> delegated to [`repository_error_to_status_code`]
pub fn service_error_to_status_code(error: &ServiceError) -> u16 {
    match error {
        ServiceError::NotFound { .. } => 404,
        ServiceError::Conflict(_) => 409,
        ServiceError::InvalidId(_) => 400,
        ServiceError::Validation(_) => 422,
        ServiceError::Repository(e) => repository_error_to_status_code(e),
    }
}
