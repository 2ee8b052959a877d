use axum::{extract::State, Json};

use sutra_core::hr::{DashboardSummary, EmployeeAttendanceSummary};

use crate::{handlers::AppError, models::ApiResponse, state::AppState};

/// Headline numbers (GET /api/v1/dashboard/summary).
pub async fn summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, AppError> {
    let summary = state.dashboard.summary().await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Per-employee attendance (GET /api/v1/dashboard/attendance-summary).
pub async fn attendance_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<EmployeeAttendanceSummary>>>, AppError> {
    let summaries = state.dashboard.attendance_summary().await?;
    let message = format!(
        "Retrieved attendance summary for {} employees",
        summaries.len()
    );
    Ok(Json(ApiResponse::ok(summaries).with_message(message)))
}
