//! API request types for employee and attendance operations.
//!
//! Payloads reject unknown fields. Normalization (trimming, case folding)
//! happens when a request is turned into a domain value; length and format
//! checks live in [`super::operations`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::{AttendanceRecord, AttendanceStatus, Employee};
use crate::serde::{deserialize_optional_date, deserialize_optional_string};

/// Request payload for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEmployeeRequest {
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
}

impl CreateEmployeeRequest {
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
            position: position.into(),
        }
    }

    /// Convert into an Employee, upper-casing the employee ID, lower-casing
    /// the email and trimming every field.
    pub fn into_employee(self) -> Employee {
        Employee::new(
            self.employee_id.trim().to_uppercase(),
            self.full_name.trim(),
            self.email.trim().to_lowercase(),
            self.department.trim(),
            self.position.trim(),
        )
    }
}

/// Request payload for updating an employee. Absent fields are left alone.
///
/// The employee ID cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployeeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl UpdateEmployeeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Trims every provided field and lower-cases the email.
    pub fn normalize(self) -> Self {
        Self {
            full_name: self.full_name.map(|s| s.trim().to_string()),
            email: self.email.map(|s| s.trim().to_lowercase()),
            department: self.department.map(|s| s.trim().to_string()),
            position: self.position.map(|s| s.trim().to_string()),
        }
    }

    /// Returns true when no field is provided.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.position.is_none()
    }

    /// Apply updates to an existing employee. Timestamps are not touched.
    pub fn apply_to(self, employee: &mut Employee) {
        if let Some(full_name) = self.full_name {
            employee.full_name = full_name;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(department) = self.department {
            employee.department = department;
        }
        if let Some(position) = self.position {
            employee.position = position;
        }
    }
}

/// Request payload for marking attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkAttendanceRequest {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl MarkAttendanceRequest {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Convert into an AttendanceRecord with an upper-cased employee ID.
    pub fn into_record(self) -> AttendanceRecord {
        let record =
            AttendanceRecord::new(self.employee_id.trim().to_uppercase(), self.date, self.status);
        match self.notes {
            Some(notes) => record.with_notes(notes),
            None => record,
        }
    }
}

/// Request payload for updating an attendance record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
}

impl UpdateAttendanceRequest {
    pub fn new(status: AttendanceStatus) -> Self {
        Self {
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Replaces the status, and the notes when provided.
    pub fn apply_to(self, record: &mut AttendanceRecord) {
        record.status = self.status;
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
    }
}

/// Query parameters for listing employees.
///
/// Empty strings are kept as-is: they do not filter, but they are part of the
/// cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeQuery {
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// Query parameters for listing attendance records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceQuery {
    #[serde(default)]
    pub employee_id: Option<String>,
    /// Exact date. Takes precedence over `start_date`/`end_date`.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
}

impl AttendanceQuery {
    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Query parameters for a single employee's attendance history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeAttendanceQuery {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_employee_normalizes_fields() {
        let employee = CreateEmployeeRequest::new(
            "  emp-001 ",
            " Rajesh Kumar ",
            " Rajesh.Kumar@Company.COM ",
            " Engineering",
            "Senior Engineer ",
        )
        .into_employee();

        assert_eq!(employee.employee_id, "EMP-001");
        assert_eq!(employee.full_name, "Rajesh Kumar");
        assert_eq!(employee.email, "rajesh.kumar@company.com");
        assert_eq!(employee.department, "Engineering");
        assert_eq!(employee.position, "Senior Engineer");
    }

    #[test]
    fn test_create_rejects_unknown_fields() {
        let json = r#"{
            "employee_id": "EMP-1", "full_name": "A B", "email": "a@b.co",
            "department": "HR", "position": "Lead", "salary": 100
        }"#;
        assert!(serde_json::from_str::<CreateEmployeeRequest>(json).is_err());
    }

    #[test]
    fn test_update_apply_only_changes_provided_fields() {
        let mut employee = CreateEmployeeRequest::new(
            "EMP-1",
            "Asha Rao",
            "asha@example.com",
            "HR",
            "Manager",
        )
        .into_employee();

        UpdateEmployeeRequest::new()
            .with_department("  Finance ")
            .normalize()
            .apply_to(&mut employee);

        assert_eq!(employee.department, "Finance");
        assert_eq!(employee.full_name, "Asha Rao");
        assert_eq!(employee.email, "asha@example.com");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdateEmployeeRequest::new().is_empty());
        assert!(!UpdateEmployeeRequest::new().with_position("Lead").is_empty());

        let parsed: UpdateEmployeeRequest = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_mark_attendance_uppercases_employee_id() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let record = MarkAttendanceRequest::new(" emp-100", date, AttendanceStatus::Present)
            .with_notes("on site")
            .into_record();

        assert_eq!(record.employee_id, "EMP-100");
        assert_eq!(record.notes.as_deref(), Some("on site"));
        assert_eq!(record.employee_name, None);
    }

    #[test]
    fn test_mark_attendance_empty_notes_become_none() {
        let json = r#"{"employee_id": "EMP-1", "date": "2026-02-07", "status": "Absent", "notes": "  "}"#;
        let request: MarkAttendanceRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.notes, None);
    }

    #[test]
    fn test_update_attendance_keeps_notes_when_absent() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        let mut record = AttendanceRecord::new("EMP-1", date, AttendanceStatus::Present)
            .with_notes("late");

        UpdateAttendanceRequest::new(AttendanceStatus::Absent).apply_to(&mut record);
        assert_eq!(record.status, AttendanceStatus::Absent);
        assert_eq!(record.notes.as_deref(), Some("late"));

        UpdateAttendanceRequest::new(AttendanceStatus::Present)
            .with_notes("sick leave cancelled")
            .apply_to(&mut record);
        assert_eq!(record.notes.as_deref(), Some("sick leave cancelled"));
    }

    #[test]
    fn test_attendance_query_treats_empty_dates_as_absent() {
        let json = r#"{"employee_id": "EMP-1", "date": "", "start_date": "2026-02-01"}"#;
        let query: AttendanceQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.date, None);
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(query.employee_id.as_deref(), Some("EMP-1"));
    }

    #[test]
    fn test_employee_query_keeps_empty_strings() {
        let query: EmployeeQuery = serde_json::from_str(r#"{"department": ""}"#).unwrap();
        assert_eq!(query.department.as_deref(), Some(""));
        assert_eq!(query.search, None);
    }
}
