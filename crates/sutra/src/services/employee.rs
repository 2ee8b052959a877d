//! Employee service.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, trace, warn};

use sutra_core::cache::{
    attendance_pattern, dashboard_pattern, employee_key, employee_list_key,
    employee_list_pattern, EMPLOYEE_LIST_TTL, EMPLOYEE_TTL,
};
use sutra_core::hr::{
    validate_employee, CreateEmployeeRequest, Employee, EmployeeQuery, ServiceError,
    UpdateEmployeeRequest,
};
use sutra_core::storage::{AttendanceRepository, EmployeeFilter, EmployeeRepository};

use super::ServiceResult;
use crate::cache::CacheStore;

/// Employee records, read through the cache.
///
/// Deleting an employee also removes their attendance, so this service holds
/// the attendance store too.
#[derive(Clone)]
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    cache: Arc<CacheStore>,
}

impl EmployeeService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        cache: Arc<CacheStore>,
    ) -> Self {
        Self {
            employees,
            attendance,
            cache,
        }
    }

    /// Creates an employee.
    ///
    /// # Errors
    ///
    /// - `Validation` when a field is malformed
    /// - `Conflict` when the employee ID or email is taken
    pub async fn create_employee(&self, request: CreateEmployeeRequest) -> ServiceResult<Employee> {
        let employee = request.into_employee();
        validate_employee(&employee)?;

        if self
            .employees
            .get_employee(&employee.employee_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Employee with ID '{}' already exists",
                employee.employee_id
            )));
        }
        if self
            .employees
            .get_employee_by_email(&employee.email)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Employee with email '{}' already exists",
                employee.email
            )));
        }

        self.employees.create_employee(&employee).await?;

        self.cache.delete_pattern(&employee_list_pattern()).await;

        debug!(employee_id = %employee.employee_id, "Employee created");
        Ok(employee)
    }

    /// Lists employees, newest first.
    ///
    /// Empty filter strings match everything but are cached under their own key.
    pub async fn list_employees(&self, query: &EmployeeQuery) -> ServiceResult<Vec<Employee>> {
        let cache_key = employee_list_key(query.department.as_deref(), query.search.as_deref());

        if let Some(employees) = self.cache.get_json::<Vec<Employee>>(&cache_key).await {
            return Ok(employees);
        }

        trace!(key = %cache_key, "Cache miss for employee list");
        let employees = self
            .employees
            .list_employees(&EmployeeFilter::from(query))
            .await?;

        self.cache
            .set_json(&cache_key, &employees, EMPLOYEE_LIST_TTL)
            .await;

        Ok(employees)
    }

    /// Gets one employee by their employee ID.
    pub async fn get_employee(&self, employee_id: &str) -> ServiceResult<Employee> {
        let cache_key = employee_key(employee_id);

        if let Some(employee) = self.cache.get_json::<Employee>(&cache_key).await {
            return Ok(employee);
        }

        trace!(%employee_id, "Cache miss for employee");
        let employee = self
            .employees
            .get_employee(employee_id)
            .await?
            .ok_or_else(|| ServiceError::employee_not_found(employee_id))?;

        self.cache
            .set_json(&cache_key, &employee, EMPLOYEE_TTL)
            .await;

        Ok(employee)
    }

    /// Applies the provided fields to an employee.
    ///
    /// A request with no fields returns the stored employee untouched.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the employee does not exist
    /// - `Validation` when the updated record is malformed
    /// - `Conflict` when the new email belongs to another employee
    pub async fn update_employee(
        &self,
        employee_id: &str,
        request: UpdateEmployeeRequest,
    ) -> ServiceResult<Employee> {
        let mut employee = self
            .employees
            .get_employee(employee_id)
            .await?
            .ok_or_else(|| ServiceError::employee_not_found(employee_id))?;

        let request = request.normalize();
        if request.is_empty() {
            return Ok(employee);
        }

        if let Some(email) = request.email.as_deref() {
            if email != employee.email {
                if let Some(owner) = self.employees.get_employee_by_email(email).await? {
                    if owner.employee_id != employee.employee_id {
                        return Err(ServiceError::Conflict(format!(
                            "Employee with email '{}' already exists",
                            email
                        )));
                    }
                }
            }
        }

        request.apply_to(&mut employee);
        validate_employee(&employee)?;
        employee.updated_at = Utc::now();

        self.employees.update_employee(&employee).await?;

        self.cache.delete(&employee_key(employee_id)).await;
        self.cache.delete_pattern(&employee_list_pattern()).await;

        debug!(%employee_id, "Employee updated");
        Ok(employee)
    }

    /// Deletes an employee and all of their attendance records.
    ///
    /// Caches are invalidated once the employee row is gone, even when removing
    /// the attendance records fails afterwards.
    pub async fn delete_employee(&self, employee_id: &str) -> ServiceResult<()> {
        if self.employees.get_employee(employee_id).await?.is_none() {
            return Err(ServiceError::employee_not_found(employee_id));
        }

        self.employees.delete_employee(employee_id).await?;
        let cascade = self
            .attendance
            .delete_attendance_for_employee(employee_id)
            .await;

        self.cache.delete(&employee_key(employee_id)).await;
        self.cache.delete_pattern(&employee_list_pattern()).await;
        self.cache.delete_pattern(&attendance_pattern()).await;
        self.cache.delete_pattern(&dashboard_pattern()).await;

        match cascade {
            Ok(removed) => {
                debug!(%employee_id, attendance_removed = removed, "Employee deleted");
                Ok(())
            }
            Err(e) => {
                warn!(%employee_id, error = %e, "Employee deleted but attendance cleanup failed");
                Err(e.into())
            }
        }
    }
}
