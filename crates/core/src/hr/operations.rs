use chrono::NaiveDate;

use super::error::ValidationError;
use super::types::{AttendanceRecord, Employee, EmployeeAttendanceSummary};

/// Maximum length of attendance notes, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// Validates an employee before creation or update.
pub fn validate_employee(employee: &Employee) -> Result<(), ValidationError> {
    if !is_valid_employee_id(&employee.employee_id) {
        return Err(ValidationError::InvalidEmployeeId(
            employee.employee_id.clone(),
        ));
    }
    check_length("full_name", &employee.full_name, 2, 100)?;
    if !is_valid_email(&employee.email) {
        return Err(ValidationError::InvalidEmail(employee.email.clone()));
    }
    check_length("department", &employee.department, 2, 50)?;
    check_length("position", &employee.position, 2, 100)?;
    Ok(())
}

/// Validates an attendance record before it is stored.
///
/// `today` is the caller's local date; records dated after it are rejected.
pub fn validate_attendance(
    record: &AttendanceRecord,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    check_length("employee_id", &record.employee_id, 3, 50)?;
    if record.date > today {
        return Err(ValidationError::FutureDate);
    }
    if let Some(notes) = &record.notes {
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(ValidationError::NotesTooLong);
        }
    }
    Ok(())
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::InvalidLength { field, min, max });
    }
    Ok(())
}

fn is_valid_employee_id(id: &str) -> bool {
    (3..=50).contains(&id.len())
        && id
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain with no empty labels.
fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

/// Splits a search string into lower-cased terms.
pub fn search_terms(search: &str) -> Vec<String> {
    search.split_whitespace().map(str::to_lowercase).collect()
}

/// Checks whether an employee passes the listing filters.
///
/// Empty or absent filters match everything. A search matches when any of its
/// terms appears in the full name, ignoring case.
pub fn employee_matches(
    employee: &Employee,
    department: Option<&str>,
    search: Option<&str>,
) -> bool {
    let department_ok = match department {
        Some(d) if !d.is_empty() => employee.department == d,
        _ => true,
    };
    let search_ok = match search {
        Some(s) if !s.trim().is_empty() => {
            let name = employee.full_name.to_lowercase();
            search_terms(s).iter().any(|term| name.contains(term))
        }
        _ => true,
    };
    department_ok && search_ok
}

/// Sorts employees newest first.
pub fn sort_employees_newest_first(employees: &mut [Employee]) {
    employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Sorts attendance records by date, newest first. Ties keep the most
/// recently created record first.
pub fn sort_attendance_newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Percentage of present days, rounded to two decimals. Zero when there are
/// no recorded days.
pub fn attendance_percentage(present_days: u64, total_days: u64) -> f64 {
    if total_days == 0 {
        return 0.0;
    }
    let raw = present_days as f64 / total_days as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Builds the attendance summary row for one employee.
pub fn build_attendance_summary(
    employee: &Employee,
    present_days: u64,
    absent_days: u64,
) -> EmployeeAttendanceSummary {
    let total_days = present_days + absent_days;
    EmployeeAttendanceSummary {
        employee_id: employee.employee_id.clone(),
        full_name: employee.full_name.clone(),
        present_days,
        absent_days,
        total_days,
        attendance_percentage: attendance_percentage(present_days, total_days),
    }
}

/// Sorts summaries by attendance percentage, highest first.
pub fn sort_summaries(summaries: &mut [EmployeeAttendanceSummary]) {
    summaries.sort_by(|a, b| b.attendance_percentage.total_cmp(&a.attendance_percentage));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hr::AttendanceStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn employee() -> Employee {
        Employee::new(
            "EMP-001",
            "Rajesh Kumar",
            "rajesh.kumar@company.com",
            "Engineering",
            "Senior Software Engineer",
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_employee_accepts_valid() {
        assert_eq!(validate_employee(&employee()), Ok(()));
    }

    #[test]
    fn test_validate_employee_id() {
        let too_long = "E".repeat(51);
        for bad in ["EM", "emp-001", "EMP_001", "EMP 001", too_long.as_str()] {
            let mut e = employee();
            e.employee_id = bad.to_string();
            assert!(
                matches!(validate_employee(&e), Err(ValidationError::InvalidEmployeeId(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_employee_lengths() {
        let mut e = employee();
        e.full_name = "A".to_string();
        assert_eq!(
            validate_employee(&e),
            Err(ValidationError::InvalidLength {
                field: "full_name",
                min: 2,
                max: 100
            })
        );

        let mut e = employee();
        e.department = "D".repeat(51);
        assert!(matches!(
            validate_employee(&e),
            Err(ValidationError::InvalidLength {
                field: "department",
                ..
            })
        ));

        let mut e = employee();
        e.position = "P".repeat(100);
        assert_eq!(validate_employee(&e), Ok(()));
    }

    #[test]
    fn test_validate_employee_email() {
        for bad in ["", "no-at-sign", "@company.com", "a@b", "a@@b.com", "a b@c.com", "a@b..com"] {
            let mut e = employee();
            e.email = bad.to_string();
            assert!(
                matches!(validate_employee(&e), Err(ValidationError::InvalidEmail(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_attendance_future_date() {
        let today = date(2026, 2, 7);
        let record = AttendanceRecord::new("EMP-1", date(2026, 2, 8), AttendanceStatus::Present);
        assert_eq!(
            validate_attendance(&record, today),
            Err(ValidationError::FutureDate)
        );

        let record = AttendanceRecord::new("EMP-1", today, AttendanceStatus::Present);
        assert_eq!(validate_attendance(&record, today), Ok(()));
    }

    #[test]
    fn test_validate_attendance_notes_length() {
        let today = date(2026, 2, 7);
        let record = AttendanceRecord::new("EMP-1", today, AttendanceStatus::Absent)
            .with_notes("n".repeat(MAX_NOTES_LEN));
        assert_eq!(validate_attendance(&record, today), Ok(()));

        let record = record.with_notes("n".repeat(MAX_NOTES_LEN + 1));
        assert_eq!(
            validate_attendance(&record, today),
            Err(ValidationError::NotesTooLong)
        );
    }

    #[test]
    fn test_employee_matches_filters() {
        let e = employee();
        assert!(employee_matches(&e, None, None));
        assert!(employee_matches(&e, Some(""), Some("")));
        assert!(employee_matches(&e, Some("Engineering"), None));
        assert!(!employee_matches(&e, Some("engineering"), None));
        assert!(employee_matches(&e, None, Some("rajesh")));
        assert!(employee_matches(&e, None, Some("nobody KUMAR")));
        assert!(!employee_matches(&e, None, Some("priya sharma")));
        assert!(!employee_matches(&e, Some("HR"), Some("rajesh")));
    }

    #[test]
    fn test_sort_employees_newest_first() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut employees = vec![
            employee().with_created_at(base),
            employee().with_created_at(base + Duration::days(2)),
            employee().with_created_at(base + Duration::days(1)),
        ];
        sort_employees_newest_first(&mut employees);
        let order: Vec<_> = employees.iter().map(|e| e.created_at).collect();
        assert_eq!(
            order,
            vec![base + Duration::days(2), base + Duration::days(1), base]
        );
    }

    #[test]
    fn test_sort_attendance_newest_first() {
        let mut records = vec![
            AttendanceRecord::new("EMP-1", date(2026, 2, 5), AttendanceStatus::Present),
            AttendanceRecord::new("EMP-1", date(2026, 2, 7), AttendanceStatus::Present),
            AttendanceRecord::new("EMP-1", date(2026, 2, 6), AttendanceStatus::Absent),
        ];
        sort_attendance_newest_first(&mut records);
        let dates: Vec<_> = records.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date(2026, 2, 7), date(2026, 2, 6), date(2026, 2, 5)]
        );
    }

    #[test]
    fn test_attendance_percentage() {
        assert_eq!(attendance_percentage(0, 0), 0.0);
        assert_eq!(attendance_percentage(18, 20), 90.0);
        assert_eq!(attendance_percentage(2, 3), 66.67);
        assert_eq!(attendance_percentage(1, 3), 33.33);
        assert_eq!(attendance_percentage(5, 5), 100.0);
    }

    #[test]
    fn test_build_and_sort_summaries() {
        let e = employee();
        let mut summaries = vec![
            build_attendance_summary(&e, 1, 3),
            build_attendance_summary(&e, 0, 0),
            build_attendance_summary(&e, 9, 1),
        ];
        assert_eq!(summaries[0].total_days, 4);
        assert_eq!(summaries[1].attendance_percentage, 0.0);

        sort_summaries(&mut summaries);
        let percentages: Vec<_> = summaries.iter().map(|s| s.attendance_percentage).collect();
        assert_eq!(percentages, vec![90.0, 25.0, 0.0]);
    }
}
