use chrono::NaiveDate;

use crate::hr::{
    employee_matches, AttendanceQuery, AttendanceRecord, AttendanceStatus, Employee, EmployeeQuery,
};

/// Maximum number of rows any listing returns.
pub const LIST_LIMIT: usize = 1000;

/// Filters for employee listings. Empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub search: Option<String>,
}

impl EmployeeFilter {
    /// Checks whether an employee passes this filter.
    pub fn matches(&self, employee: &Employee) -> bool {
        employee_matches(employee, self.department.as_deref(), self.search.as_deref())
    }
}

impl From<&EmployeeQuery> for EmployeeFilter {
    fn from(query: &EmployeeQuery) -> Self {
        Self {
            department: query.department.clone(),
            search: query.search.clone(),
        }
    }
}

/// Filters for attendance listings and counts.
///
/// When `date` is set the `start_date`/`end_date` range is ignored. Range
/// bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_employee(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: Some(employee_id.into()),
            ..Self::default()
        }
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns the effective employee filter, ignoring empty strings.
    pub fn employee(&self) -> Option<&str> {
        self.employee_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns the effective `(start, end)` range, or `None` when an exact
    /// date is set.
    pub fn range(&self) -> Option<(Option<NaiveDate>, Option<NaiveDate>)> {
        match self.date {
            Some(_) => None,
            None => Some((self.start_date, self.end_date)),
        }
    }

    /// Checks whether a record passes this filter.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        let employee_ok = self.employee().is_none_or(|id| record.employee_id == id);
        let date_ok = match self.range() {
            None => self.date == Some(record.date),
            Some((start, end)) => {
                start.is_none_or(|s| record.date >= s) && end.is_none_or(|e| record.date <= e)
            }
        };
        let status_ok = self.status.is_none_or(|s| record.status == s);
        employee_ok && date_ok && status_ok
    }
}

impl From<&AttendanceQuery> for AttendanceFilter {
    fn from(query: &AttendanceQuery) -> Self {
        Self {
            employee_id: query.employee_id.clone(),
            date: query.date,
            start_date: query.start_date,
            end_date: query.end_date,
            status: query.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    fn record(employee_id: &str, day: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord::new(employee_id, date(day), status)
    }

    #[test]
    fn test_all_matches_everything() {
        let filter = AttendanceFilter::all();
        assert!(filter.matches(&record("EMP-1", 1, AttendanceStatus::Present)));
        assert!(filter.matches(&record("EMP-2", 28, AttendanceStatus::Absent)));
    }

    #[test]
    fn test_employee_and_status_filters() {
        let filter = AttendanceFilter::for_employee("EMP-1").with_status(AttendanceStatus::Absent);
        assert!(filter.matches(&record("EMP-1", 3, AttendanceStatus::Absent)));
        assert!(!filter.matches(&record("EMP-1", 3, AttendanceStatus::Present)));
        assert!(!filter.matches(&record("EMP-2", 3, AttendanceStatus::Absent)));
    }

    #[test]
    fn test_empty_employee_id_does_not_filter() {
        let filter = AttendanceFilter::for_employee("");
        assert_eq!(filter.employee(), None);
        assert!(filter.matches(&record("EMP-7", 3, AttendanceStatus::Present)));
    }

    #[test]
    fn test_range_is_inclusive() {
        let filter = AttendanceFilter {
            start_date: Some(date(5)),
            end_date: Some(date(7)),
            ..AttendanceFilter::default()
        };
        assert!(!filter.matches(&record("EMP-1", 4, AttendanceStatus::Present)));
        assert!(filter.matches(&record("EMP-1", 5, AttendanceStatus::Present)));
        assert!(filter.matches(&record("EMP-1", 7, AttendanceStatus::Present)));
        assert!(!filter.matches(&record("EMP-1", 8, AttendanceStatus::Present)));
    }

    #[test]
    fn test_open_ended_range() {
        let filter = AttendanceFilter {
            start_date: Some(date(5)),
            ..AttendanceFilter::default()
        };
        assert!(filter.matches(&record("EMP-1", 28, AttendanceStatus::Present)));
        assert!(!filter.matches(&record("EMP-1", 4, AttendanceStatus::Present)));
    }

    #[test]
    fn test_exact_date_takes_precedence_over_range() {
        let filter = AttendanceFilter {
            date: Some(date(10)),
            start_date: Some(date(1)),
            end_date: Some(date(3)),
            ..AttendanceFilter::default()
        };
        assert_eq!(filter.range(), None);
        assert!(filter.matches(&record("EMP-1", 10, AttendanceStatus::Present)));
        assert!(!filter.matches(&record("EMP-1", 2, AttendanceStatus::Present)));
    }

    #[test]
    fn test_employee_filter_from_query() {
        let query = EmployeeQuery {
            department: Some("HR".to_string()),
            search: None,
        };
        let filter = EmployeeFilter::from(&query);
        let hr = Employee::new("EMP-1", "Asha Rao", "asha@example.com", "HR", "Lead");
        let eng = Employee::new("EMP-2", "Ravi Iyer", "ravi@example.com", "Engineering", "Dev");
        assert!(filter.matches(&hr));
        assert!(!filter.matches(&eng));
    }
}
