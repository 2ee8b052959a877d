use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// One page of a cursor-based key scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Keys matching the pattern on this page. May be empty even when more
    /// pages remain.
    pub keys: Vec<String>,
    /// Cursor to pass to the next `scan` call, or `None` once iteration is
    /// complete.
    pub next: Option<String>,
}

impl ScanPage {
    /// Returns true when no further pages remain.
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Raw key/value operations a cache backend must provide.
///
/// Engines report every failure as a [`CacheError`](super::CacheError); the
/// store wrapping them decides how to degrade.
#[async_trait]
pub trait CacheEngine: Send + Sync {
    /// Liveness probe.
    async fn ping(&self) -> Result<()>;

    /// Gets the raw string stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, expiring after `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Deletes the given keys. Missing keys are ignored.
    async fn delete(&self, keys: &[String]) -> Result<()>;

    /// Returns the next page of keys matching a glob `pattern`.
    ///
    /// Pass `None` to start a new iteration. `count` is a hint for how much
    /// work one call should do.
    async fn scan(&self, cursor: Option<&str>, pattern: &str, count: usize) -> Result<ScanPage>;

    /// Removes every key in the engine's namespace.
    async fn flush(&self) -> Result<()>;
}
