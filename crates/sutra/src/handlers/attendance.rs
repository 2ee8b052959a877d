use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use sutra_core::hr::{
    AttendanceQuery, AttendanceRecord, EmployeeAttendanceQuery, MarkAttendanceRequest,
    UpdateAttendanceRequest,
};

use crate::{
    handlers::AppError,
    models::{ApiResponse, ListResponse},
    state::AppState,
};

/// Mark attendance (POST /api/v1/attendance).
pub async fn mark_attendance(
    State(state): State<AppState>,
    payload: Result<Json<MarkAttendanceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceRecord>>), AppError> {
    let Json(payload) = payload?;
    let record = state.attendance.mark_attendance(payload).await?;

    tracing::info!(
        employee_id = %record.employee_id,
        date = %record.date,
        status = %record.status,
        "Marked attendance"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message("Attendance marked successfully")),
    ))
}

/// List attendance (GET /api/v1/attendance?employee_id=&date=&start_date=&end_date=&status=).
pub async fn list_attendance(
    State(state): State<AppState>,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> Result<Json<ListResponse<AttendanceRecord>>, AppError> {
    let Query(query) = query?;
    let records = state.attendance.list_attendance(&query).await?;
    Ok(Json(records.into()))
}

/// One employee's attendance (GET /api/v1/attendance/{employee_id}).
///
/// Shares its path with the record routes below; the segment is read as an
/// employee ID here and as a record ID for PUT and DELETE.
pub async fn employee_attendance(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    query: Result<Query<EmployeeAttendanceQuery>, QueryRejection>,
) -> Result<Json<ListResponse<AttendanceRecord>>, AppError> {
    let Query(range) = query?;
    let records = state
        .attendance
        .employee_attendance(&employee_id, &range)
        .await?;
    Ok(Json(records.into()))
}

/// Update a record (PUT /api/v1/attendance/{record_id}).
pub async fn update_attendance(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    payload: Result<Json<UpdateAttendanceRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, AppError> {
    let Json(payload) = payload?;
    let record = state
        .attendance
        .update_attendance(&record_id, payload)
        .await?;

    tracing::info!(record_id = %record.id, status = %record.status, "Updated attendance");

    Ok(Json(
        ApiResponse::ok(record).with_message("Attendance updated successfully"),
    ))
}

/// Delete a record (DELETE /api/v1/attendance/{record_id}).
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.attendance.delete_attendance(&record_id).await?;

    tracing::info!(record_id = %record_id, "Deleted attendance record");

    Ok(Json(ApiResponse::message(
        "Attendance record deleted successfully",
    )))
}
