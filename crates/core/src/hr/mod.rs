mod error;
mod operations;
mod requests;
mod types;

pub use error::{service_error_to_status_code, ServiceError, ValidationError};
pub use operations::{
    attendance_percentage, build_attendance_summary, employee_matches, search_terms,
    sort_attendance_newest_first, sort_employees_newest_first, sort_summaries,
    validate_attendance, validate_employee, MAX_NOTES_LEN,
};
pub use requests::{
    AttendanceQuery, CreateEmployeeRequest, EmployeeAttendanceQuery, EmployeeQuery,
    MarkAttendanceRequest, UpdateAttendanceRequest, UpdateEmployeeRequest,
};
pub use types::{
    AttendanceRecord, AttendanceStatus, DashboardSummary, Employee, EmployeeAttendanceSummary,
};
