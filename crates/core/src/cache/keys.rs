//! Cache key construction.
//!
//! Keys follow a fixed namespace shared with any existing deployment:
//!
//! - `employee:{employee_id}`
//! - `employees:list:{hash}`
//! - `attendance:list:{hash}`
//! - `dashboard:summary`
//! - `dashboard:attendance_summary`
//!
//! Parameterized reads append a short digest of their filter parameters so
//! keys stay bounded in length regardless of filter values.

use std::collections::BTreeMap;

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the parameter digest.
pub const KEY_HASH_LEN: usize = 8;

/// Prefix for filtered employee listings.
pub const EMPLOYEE_LIST_PREFIX: &str = "employees:list";

/// Prefix for filtered attendance listings.
pub const ATTENDANCE_LIST_PREFIX: &str = "attendance:list";

/// Builds a deterministic cache key from a prefix and filter parameters.
///
/// With no parameters the prefix is returned unchanged. Otherwise the
/// parameters are serialized canonically (keys sorted, absent values encoded
/// as `null` so they differ from empty strings), hashed, and the first
/// [`KEY_HASH_LEN`] hex characters are appended as `"{prefix}:{hash}"`.
///
/// Parameter order does not matter. When a name appears twice the last
/// value wins.
///
/// # Examples
///
/// ```
/// use sutra_core::cache::build_key;
///
/// assert_eq!(build_key::<&str, &str, _>("dashboard:summary", []), "dashboard:summary");
///
/// let a = build_key("employees:list", [("department", Some("HR")), ("search", None)]);
/// let b = build_key("employees:list", [("search", None), ("department", Some("HR"))]);
/// assert_eq!(a, b);
/// assert!(a.starts_with("employees:list:"));
/// ```
pub fn build_key<K, V, I>(prefix: &str, params: I) -> String
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, Option<V>)>,
{
    let canonical: BTreeMap<String, Option<String>> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.map(Into::into)))
        .collect();

    if canonical.is_empty() {
        return prefix.to_string();
    }

    // A map of strings to optional strings always serializes.
    let encoded = serde_json::to_vec(&canonical).unwrap_or_default();
    let digest = hex::encode(Sha256::digest(&encoded));

    format!("{}:{}", prefix, &digest[..KEY_HASH_LEN])
}

/// Returns the cache key for a single employee.
pub fn employee_key(employee_id: &str) -> String {
    format!("employee:{}", employee_id)
}

/// Returns the cache key for an employee listing with the given filters.
pub fn employee_list_key(department: Option<&str>, search: Option<&str>) -> String {
    build_key(
        EMPLOYEE_LIST_PREFIX,
        [("department", department), ("search", search)],
    )
}

/// Returns the pattern matching every employee listing key.
pub fn employee_list_pattern() -> String {
    format!("{}:*", EMPLOYEE_LIST_PREFIX)
}

/// Returns the cache key for an attendance listing with the given filters.
///
/// Dates are expected in `YYYY-MM-DD` form and status as `Present`/`Absent`.
pub fn attendance_list_key(
    employee_id: Option<&str>,
    date: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
    status: Option<&str>,
) -> String {
    build_key(
        ATTENDANCE_LIST_PREFIX,
        [
            ("employee_id", employee_id),
            ("date", date),
            ("start_date", start_date),
            ("end_date", end_date),
            ("status", status),
        ],
    )
}

/// Returns the pattern matching every attendance key.
pub fn attendance_pattern() -> String {
    "attendance:*".to_string()
}

/// Returns the cache key for the dashboard summary.
pub fn dashboard_summary_key() -> String {
    "dashboard:summary".to_string()
}

/// Returns the cache key for the per-employee attendance summary.
pub fn dashboard_attendance_summary_key() -> String {
    "dashboard:attendance_summary".to_string()
}

/// Returns the pattern matching every dashboard key.
pub fn dashboard_pattern() -> String {
    "dashboard:*".to_string()
}
