//! Expiry periods for cached reads.

use std::time::Duration;

/// Applied when a write names no TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Single employee records.
pub const EMPLOYEE_TTL: Duration = Duration::from_secs(300);

/// Filtered employee listings.
pub const EMPLOYEE_LIST_TTL: Duration = Duration::from_secs(60);

/// Filtered attendance listings.
pub const ATTENDANCE_LIST_TTL: Duration = Duration::from_secs(60);

/// Dashboard headline counts.
pub const DASHBOARD_SUMMARY_TTL: Duration = Duration::from_secs(30);

/// Per-employee attendance percentages.
pub const ATTENDANCE_SUMMARY_TTL: Duration = Duration::from_secs(60);
