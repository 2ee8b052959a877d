use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use sutra_core::hr::{service_error_to_status_code, ServiceError};

use crate::models::ErrorResponse;

/// Error returned by every API handler.
///
/// Renders as `{"success": false, "detail": ...}` with the status derived
/// from the underlying error.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    Rejected { status: StatusCode, detail: String },
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(e) => StatusCode::from_u16(service_error_to_status_code(e))
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match self {
            // Store failures are logged in full and reported generically.
            AppError::Service(e) if status.is_server_error() => {
                tracing::error!(error = %e, "Request failed");
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    "Service temporarily unavailable".to_string()
                } else {
                    "Internal server error".to_string()
                }
            }
            AppError::Service(e) => e.to_string(),
            AppError::Rejected { detail, .. } => detail,
        };

        (status, Json(ErrorResponse::new(detail))).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Rejected {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: rejection.body_text(),
        }
    }
}
