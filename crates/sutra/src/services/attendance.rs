//! Attendance service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, trace};
use uuid::Uuid;

use sutra_core::cache::{
    attendance_list_key, attendance_pattern, dashboard_pattern, ATTENDANCE_LIST_TTL,
};
use sutra_core::hr::{
    validate_attendance, AttendanceQuery, AttendanceRecord, EmployeeAttendanceQuery,
    MarkAttendanceRequest, ServiceError, UpdateAttendanceRequest,
};
use sutra_core::storage::{AttendanceFilter, AttendanceRepository, EmployeeRepository};

use super::{today, ServiceResult};
use crate::cache::CacheStore;

/// Attendance records, read through the cache.
///
/// Every write invalidates all attendance listings and the dashboard, since
/// any attendance change can move the daily counts.
#[derive(Clone)]
pub struct AttendanceService {
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    cache: Arc<CacheStore>,
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_record_id(record_id: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(record_id).map_err(|_| ServiceError::InvalidId(record_id.to_string()))
}

/// Cache key for a listing. All five filters take part, dates as `YYYY-MM-DD`.
fn list_key(query: &AttendanceQuery) -> String {
    let date = query.date.map(format_date);
    let start_date = query.start_date.map(format_date);
    let end_date = query.end_date.map(format_date);
    attendance_list_key(
        query.employee_id.as_deref(),
        date.as_deref(),
        start_date.as_deref(),
        end_date.as_deref(),
        query.status.map(|s| s.as_str()),
    )
}

impl AttendanceService {
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

    /// Marks attendance for one employee on one day.
    ///
    /// # Errors
    ///
    /// - `Validation` for future dates or oversized notes
    /// - `NotFound` when the employee does not exist
    /// - `Conflict` when the employee already has a record for that day
    pub async fn mark_attendance(
        &self,
        request: MarkAttendanceRequest,
    ) -> ServiceResult<AttendanceRecord> {
        let record = request.into_record();
        validate_attendance(&record, today())?;

        if self
            .employees
            .get_employee(&record.employee_id)
            .await?
            .is_none()
        {
            return Err(ServiceError::employee_not_found(&record.employee_id));
        }

        if self
            .attendance
            .find_attendance(&record.employee_id, record.date)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Attendance already marked for employee '{}' on {}",
                record.employee_id, record.date
            )));
        }

        self.attendance.create_attendance(&record).await?;
        self.invalidate().await;

        debug!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            date = %record.date,
            status = %record.status,
            "Attendance marked"
        );
        Ok(record)
    }

    /// Lists attendance records, newest date first, each carrying the
    /// employee's name when the employee still exists.
    pub async fn list_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        let cache_key = list_key(query);

        if let Some(records) = self
            .cache
            .get_json::<Vec<AttendanceRecord>>(&cache_key)
            .await
        {
            return Ok(records);
        }

        trace!(key = %cache_key, "Cache miss for attendance list");
        let mut records = self
            .attendance
            .list_attendance(&AttendanceFilter::from(query))
            .await?;
        self.attach_employee_names(&mut records).await?;

        self.cache
            .set_json(&cache_key, &records, ATTENDANCE_LIST_TTL)
            .await;

        Ok(records)
    }

    /// Lists one employee's attendance within an optional date range.
    ///
    /// The employee must exist in the record store; a cached listing alone is
    /// not proof of existence.
    pub async fn employee_attendance(
        &self,
        employee_id: &str,
        range: &EmployeeAttendanceQuery,
    ) -> ServiceResult<Vec<AttendanceRecord>> {
        if self.employees.get_employee(employee_id).await?.is_none() {
            return Err(ServiceError::employee_not_found(employee_id));
        }

        let query = AttendanceQuery::for_employee(employee_id)
            .with_range(range.start_date, range.end_date);
        self.list_attendance(&query).await
    }

    /// Replaces a record's status, and its notes when provided.
    ///
    /// # Errors
    ///
    /// - `InvalidId` when `record_id` is not a UUID
    /// - `NotFound` when no record has that ID
    /// - `Validation` for oversized notes
    pub async fn update_attendance(
        &self,
        record_id: &str,
        request: UpdateAttendanceRequest,
    ) -> ServiceResult<AttendanceRecord> {
        let id = parse_record_id(record_id)?;
        let mut record = self
            .attendance
            .get_attendance(id)
            .await?
            .ok_or_else(|| ServiceError::attendance_not_found(record_id))?;

        request.apply_to(&mut record);
        // The date is fixed once marked; only the notes can newly fail.
        validate_attendance(&record, today().max(record.date))?;

        self.attendance.update_attendance(&record).await?;
        self.invalidate().await;

        debug!(record_id = %id, status = %record.status, "Attendance updated");
        Ok(record)
    }

    /// Deletes one attendance record.
    pub async fn delete_attendance(&self, record_id: &str) -> ServiceResult<()> {
        let id = parse_record_id(record_id)?;
        if self.attendance.get_attendance(id).await?.is_none() {
            return Err(ServiceError::attendance_not_found(record_id));
        }

        self.attendance.delete_attendance(id).await?;
        self.invalidate().await;

        debug!(record_id = %id, "Attendance deleted");
        Ok(())
    }

    async fn invalidate(&self) {
        self.cache.delete_pattern(&attendance_pattern()).await;
        self.cache.delete_pattern(&dashboard_pattern()).await;
    }

    /// Fills `employee_name`, looking each employee up once.
    async fn attach_employee_names(&self, records: &mut [AttendanceRecord]) -> ServiceResult<()> {
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        for record in records.iter_mut() {
            if !names.contains_key(&record.employee_id) {
                let name = self
                    .employees
                    .get_employee(&record.employee_id)
                    .await?
                    .map(|e| e.full_name);
                names.insert(record.employee_id.clone(), name);
            }
            record.employee_name = names.get(&record.employee_id).cloned().flatten();
        }
        Ok(())
    }
}
