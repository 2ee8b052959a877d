//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use sutra_core::hr::{AttendanceRecord, AttendanceStatus, Employee};
use sutra_core::storage::{AttendanceFilter, LIST_LIMIT};

// ============================================================================
// Employee conversions
// ============================================================================

/// Convert a SQLite row to an Employee.
///
/// Expected columns: id, employee_id, full_name, email, department, position,
/// created_at, updated_at
pub fn row_to_employee(row: &Row) -> rusqlite::Result<Employee> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Employee {
        id: parse_uuid(&id)?,
        employee_id: row.get(1)?,
        full_name: row.get(2)?,
        email: row.get(3)?,
        department: row.get(4)?,
        position: row.get(5)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Convert a department aggregate row to `(department, count)`.
pub fn row_to_department_count(row: &Row) -> rusqlite::Result<(String, u64)> {
    let department: String = row.get(0)?;
    let count: i64 = row.get(1)?;
    Ok((department, count_to_u64(count)))
}

// ============================================================================
// Attendance conversions
// ============================================================================

/// Convert a SQLite row to an AttendanceRecord.
///
/// Expected columns: id, employee_id, date, status, notes, created_at.
/// `employee_name` is left unset; it is not persisted.
pub fn row_to_attendance(row: &Row) -> rusqlite::Result<AttendanceRecord> {
    let id: String = row.get(0)?;
    let date: String = row.get(2)?;
    let status: String = row.get(3)?;
    let created_at: String = row.get(5)?;

    Ok(AttendanceRecord {
        id: parse_uuid(&id)?,
        employee_id: row.get(1)?,
        employee_name: None,
        date: parse_date(&date)?,
        status: parse_status(&status)?,
        notes: row.get(4)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Bind values for the filtered attendance queries.
///
/// Order: employee_id, exact date, range start, range end, status.
/// `None` binds NULL, which disables that condition.
pub fn attendance_filter_params(filter: &AttendanceFilter) -> [Option<String>; 5] {
    let (start, end) = match filter.range() {
        Some((start, end)) => (start.map(|d| format_date(&d)), end.map(|d| format_date(&d))),
        None => (None, None),
    };

    [
        filter.employee().map(str::to_string),
        filter.date.as_ref().map(format_date),
        start,
        end,
        filter.status.map(|s| s.as_str().to_string()),
    ]
}

/// The row limit for list queries as a SQLite integer.
pub fn list_limit() -> i64 {
    i64::try_from(LIST_LIMIT).unwrap_or(i64::MAX)
}

/// SQLite counts are signed; negative values never occur.
pub fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a date from ISO 8601 string (YYYY-MM-DD).
fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Parse an attendance status as stored ("Present" / "Absent").
fn parse_status(s: &str) -> rusqlite::Result<AttendanceStatus> {
    s.parse::<AttendanceStatus>().map_err(|msg| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, msg)),
        )
    })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Fixed-width RFC 3339 with nanoseconds, so text ordering matches time ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
