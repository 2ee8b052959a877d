//! Glob matching for cache key patterns.
//!
//! Supports the subset of Redis `MATCH` syntax the invalidation protocol
//! uses: `*` matches any run of characters (including none) and `?` matches
//! exactly one character. Every other character matches itself.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use sutra_core::cache::pattern_matches;
///
/// assert!(pattern_matches("employees:list:*", "employees:list:1a2b3c4d"));
/// assert!(pattern_matches("dashboard:*", "dashboard:summary"));
/// assert!(pattern_matches("employee:EMP-10?", "employee:EMP-100"));
/// assert!(!pattern_matches("attendance:*", "employees:list:1a2b3c4d"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let key: Vec<char> = key.chars().collect();

    let (mut p, mut k) = (0, 0);
    // Position of the last `*` seen and the key index it is currently absorbing up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while k < key.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, k));
                p += 1;
            }
            Some(&c) if c == '?' || c == key[k] => {
                p += 1;
                k += 1;
            }
            _ => match backtrack {
                Some((star, absorbed)) => {
                    p = star + 1;
                    k = absorbed + 1;
                    backtrack = Some((star, absorbed + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
