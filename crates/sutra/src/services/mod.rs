//! Record services.
//!
//! Each service reads through the cache and invalidates on write:
//!
//! - **Reads**: check the cache, on miss query the record store and populate
//!   the cache with the endpoint's TTL
//! - **Writes**: check invariants against the record store, apply the
//!   mutation, then invalidate every key or pattern that could be stale
//!
//! Invalidation always runs after the mutation has been applied. The cache
//! never enforces entity invariants; uniqueness is the record store's job.

mod attendance;
mod dashboard;
mod employee;

use chrono::NaiveDate;

use sutra_core::hr::ServiceError;

pub use attendance::AttendanceService;
pub use dashboard::DashboardService;
pub use employee::EmployeeService;

/// Result type for service operations.
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Today's date in the server's local time zone.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
