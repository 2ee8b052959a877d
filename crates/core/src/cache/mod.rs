mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;
mod ttl;

pub use error::{CacheError, Result};
pub use keys::{
    attendance_list_key, attendance_pattern, build_key, dashboard_attendance_summary_key,
    dashboard_pattern, dashboard_summary_key, employee_key, employee_list_key,
    employee_list_pattern, ATTENDANCE_LIST_PREFIX, EMPLOYEE_LIST_PREFIX, KEY_HASH_LEN,
};
pub use patterns::pattern_matches;
pub use serialization::{decode_value, encode_value};
pub use traits::{CacheEngine, ScanPage};
pub use ttl::{
    ATTENDANCE_LIST_TTL, ATTENDANCE_SUMMARY_TTL, DASHBOARD_SUMMARY_TTL, DEFAULT_TTL,
    EMPLOYEE_LIST_TTL, EMPLOYEE_TTL,
};
