use async_trait::async_trait;
use uuid::Uuid;

use crate::hr::{AttendanceRecord, Employee};

use super::{AttendanceFilter, EmployeeFilter, Result};

/// Record store for employees.
///
/// Implementations enforce uniqueness of `employee_id` and `email`, reporting
/// violations as [`RepositoryError::AlreadyExists`](super::RepositoryError::AlreadyExists).
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Gets an employee by their human-facing ID.
    async fn get_employee(&self, employee_id: &str) -> Result<Option<Employee>>;

    /// Gets an employee by email address.
    async fn get_employee_by_email(&self, email: &str) -> Result<Option<Employee>>;

    /// Lists employees matching the filter, newest first, at most
    /// [`LIST_LIMIT`](super::LIST_LIMIT).
    async fn list_employees(&self, filter: &EmployeeFilter) -> Result<Vec<Employee>>;

    /// Counts all employees.
    async fn count_employees(&self) -> Result<u64>;

    /// Counts employees per department.
    async fn department_counts(&self) -> Result<Vec<(String, u64)>>;

    /// Inserts a new employee.
    async fn create_employee(&self, employee: &Employee) -> Result<()>;

    /// Replaces an existing employee, matched by `employee_id`.
    async fn update_employee(&self, employee: &Employee) -> Result<()>;

    /// Deletes an employee by their human-facing ID.
    async fn delete_employee(&self, employee_id: &str) -> Result<()>;
}

/// Record store for attendance records.
///
/// Implementations enforce uniqueness of `(employee_id, date)`.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Gets a record by its ID.
    async fn get_attendance(&self, id: Uuid) -> Result<Option<AttendanceRecord>>;

    /// Gets the record for an employee on a given day.
    async fn find_attendance(
        &self,
        employee_id: &str,
        date: chrono::NaiveDate,
    ) -> Result<Option<AttendanceRecord>>;

    /// Lists records matching the filter, newest date first, at most
    /// [`LIST_LIMIT`](super::LIST_LIMIT). `employee_name` is left unset.
    async fn list_attendance(&self, filter: &AttendanceFilter) -> Result<Vec<AttendanceRecord>>;

    /// Counts records matching the filter.
    async fn count_attendance(&self, filter: &AttendanceFilter) -> Result<u64>;

    /// Inserts a new record.
    async fn create_attendance(&self, record: &AttendanceRecord) -> Result<()>;

    /// Replaces an existing record, matched by `id`.
    async fn update_attendance(&self, record: &AttendanceRecord) -> Result<()>;

    /// Deletes a record by its ID.
    async fn delete_attendance(&self, id: Uuid) -> Result<()>;

    /// Deletes every record for an employee, returning how many were removed.
    async fn delete_attendance_for_employee(&self, employee_id: &str) -> Result<u64>;
}
