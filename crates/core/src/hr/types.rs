use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Record-store identifier.
    pub id: Uuid,
    /// Human-facing identifier such as `EMP-001`. Unique.
    pub employee_id: String,
    pub full_name: String,
    /// Lower-cased. Unique.
    pub email: String,
    pub department: String,
    pub position: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Creates a new employee with a fresh record id and timestamps.
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
            position: position.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the creation time (useful for testing ordering).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }
}

/// Whether an employee was present on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            other => Err(format!("Invalid attendance status: {}", other)),
        }
    }
}

/// One attendance mark for one employee on one day.
///
/// At most one record exists per `(employee_id, date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub employee_id: String,
    /// Filled in on listing reads from the employee record; never stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Creates a new attendance record.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id: employee_id.into(),
            employee_name: None,
            date,
            status,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the notes for this record.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_employees: u64,
    pub present_today: u64,
    pub absent_today: u64,
    /// Employee count per department, keyed by department name.
    pub department_counts: BTreeMap<String, u64>,
}

/// Attendance totals for a single employee across all recorded days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAttendanceSummary {
    pub employee_id: String,
    pub full_name: String,
    pub present_days: u64,
    pub absent_days: u64,
    pub total_days: u64,
    pub attendance_percentage: f64,
}
