use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use sutra_core::hr::{CreateEmployeeRequest, Employee, EmployeeQuery, UpdateEmployeeRequest};

use crate::{
    handlers::AppError,
    models::{ApiResponse, ListResponse},
    state::AppState,
};

/// Create an employee (POST /api/v1/employees).
pub async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Employee>>), AppError> {
    let Json(payload) = payload?;
    let employee = state.employees.create_employee(payload).await?;

    tracing::info!(employee_id = %employee.employee_id, "Created employee");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(employee).with_message("Employee created successfully")),
    ))
}

/// List employees (GET /api/v1/employees?department=&search=).
pub async fn list_employees(
    State(state): State<AppState>,
    query: Result<Query<EmployeeQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Employee>>, AppError> {
    let Query(query) = query?;
    let employees = state.employees.list_employees(&query).await?;
    Ok(Json(employees.into()))
}

/// Get one employee (GET /api/v1/employees/{employee_id}).
pub async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let employee = state.employees.get_employee(&employee_id).await?;
    Ok(Json(
        ApiResponse::ok(employee).with_message("Employee retrieved successfully"),
    ))
}

/// Update an employee (PUT /api/v1/employees/{employee_id}).
pub async fn update_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Employee>>, AppError> {
    let Json(payload) = payload?;
    let employee = state
        .employees
        .update_employee(&employee_id, payload)
        .await?;

    tracing::info!(employee_id = %employee_id, "Updated employee");

    Ok(Json(
        ApiResponse::ok(employee).with_message("Employee updated successfully"),
    ))
}

/// Delete an employee and their attendance (DELETE /api/v1/employees/{employee_id}).
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.employees.delete_employee(&employee_id).await?;

    tracing::info!(employee_id = %employee_id, "Deleted employee and their attendance");

    Ok(Json(ApiResponse::message(format!(
        "Employee {} and associated records deleted successfully",
        employee_id
    ))))
}
