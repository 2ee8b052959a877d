//! The cache store used by the record services.
//!
//! Wraps a [`CacheEngine`] and absorbs every engine failure: reads degrade to
//! a miss, writes and deletes degrade to a no-op, and each failure is logged
//! at `warn`. Every engine call is bounded by the store's operation timeout,
//! so a stalled engine costs at most that long per call. Only
//! [`CacheStore::connect`] reports errors, because an unreachable engine at
//! startup is fatal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

use sutra_core::cache::{decode_value, encode_value, CacheEngine, CacheError, Result, DEFAULT_TTL};

/// Default number of keys requested per scan page.
pub const DEFAULT_SCAN_COUNT: usize = 100;

/// Default upper bound on a single engine call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(500);

/// Runs one engine call, turning a missed deadline into [`CacheError::Timeout`].
async fn bounded<T>(
    operation: &'static str,
    limit: Duration,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout { operation, limit }),
    }
}

/// TTL key-value store with graceful degradation.
pub struct CacheStore {
    engine: RwLock<Option<Arc<dyn CacheEngine>>>,
    scan_count: usize,
    timeout: Duration,
}

impl CacheStore {
    /// Connects to `engine`, verifying it with a liveness probe.
    ///
    /// `timeout` bounds the initial PING and every later engine call.
    ///
    /// # Errors
    ///
    /// Returns the PING error when the engine is unreachable or does not
    /// answer within `timeout`.
    pub async fn connect(
        engine: Arc<dyn CacheEngine>,
        scan_count: usize,
        timeout: Duration,
    ) -> Result<Self> {
        bounded("PING", timeout, engine.ping()).await?;
        info!("Cache connected");
        Ok(Self {
            engine: RwLock::new(Some(engine)),
            scan_count: scan_count.max(1),
            timeout,
        })
    }

    /// A store with no engine: every read misses and every write is skipped.
    pub fn disconnected() -> Self {
        Self {
            engine: RwLock::new(None),
            scan_count: DEFAULT_SCAN_COUNT,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Detaches the engine. Subsequent operations behave as
    /// [`disconnected`](Self::disconnected).
    pub async fn close(&self) {
        if self.engine.write().await.take().is_some() {
            info!("Cache connection closed");
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.engine.read().await.is_some()
    }

    async fn engine(&self) -> Option<Arc<dyn CacheEngine>> {
        self.engine.read().await.clone()
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        bounded(operation, self.timeout, call).await
    }

    /// Reads a value. Returns `None` on a miss, when disconnected, or when the
    /// engine fails or stalls.
    ///
    /// Stored text that parses as JSON comes back structured; anything else
    /// comes back as a JSON string.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let engine = self.engine().await?;
        match self.call("GET", engine.get(key)).await {
            Ok(raw) => raw.map(|raw| decode_value(&raw)),
            Err(e) => {
                warn!(key = %key, error = %e, unreachable = e.is_unreachable(), "Cache get failed");
                None
            }
        }
    }

    /// Stores a value, replacing any previous value under `key`.
    ///
    /// `ttl` accepts a `Duration` or `None`; `None` applies [`DEFAULT_TTL`].
    pub async fn set(&self, key: &str, value: &Value, ttl: impl Into<Option<Duration>>) {
        let Some(engine) = self.engine().await else {
            return;
        };
        let encoded = match encode_value(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache value encoding failed");
                return;
            }
        };
        let ttl = ttl.into().unwrap_or(DEFAULT_TTL);
        if let Err(e) = self.call("SET EX", engine.set_ex(key, &encoded, ttl)).await {
            warn!(key = %key, error = %e, unreachable = e.is_unreachable(), "Cache set failed");
        }
    }

    /// Removes one key. Missing keys are not an error.
    pub async fn delete(&self, key: &str) {
        let Some(engine) = self.engine().await else {
            return;
        };
        let keys = [key.to_string()];
        if let Err(e) = self.call("DEL", engine.delete(&keys)).await {
            warn!(key = %key, error = %e, unreachable = e.is_unreachable(), "Cache delete failed");
        }
    }

    /// Removes every key matching a glob pattern, scanning page by page until
    /// the engine reports the iteration is complete.
    ///
    /// A failure or stall stops the sweep; keys not yet reached are left to
    /// expire.
    pub async fn delete_pattern(&self, pattern: &str) {
        let Some(engine) = self.engine().await else {
            return;
        };

        let mut cursor: Option<String> = None;
        let mut deleted = 0usize;
        loop {
            let scan = engine.scan(cursor.as_deref(), pattern, self.scan_count);
            let page = match self.call("SCAN", scan).await {
                Ok(page) => page,
                Err(e) => {
                    warn!(
                        pattern = %pattern,
                        error = %e,
                        unreachable = e.is_unreachable(),
                        "Cache scan failed"
                    );
                    return;
                }
            };

            if !page.keys.is_empty() {
                if let Err(e) = self.call("DEL", engine.delete(&page.keys)).await {
                    warn!(
                        pattern = %pattern,
                        error = %e,
                        unreachable = e.is_unreachable(),
                        "Cache pattern delete failed"
                    );
                    return;
                }
                deleted += page.keys.len();
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        debug!(pattern = %pattern, deleted, "Cache pattern invalidated");
    }

    /// Wipes the whole cache namespace. Maintenance only.
    pub async fn clear_all(&self) {
        let Some(engine) = self.engine().await else {
            return;
        };
        match self.call("FLUSHDB", engine.flush()).await {
            Ok(()) => info!("Cache cleared"),
            Err(e) => warn!(error = %e, unreachable = e.is_unreachable(), "Cache clear failed"),
        }
    }

    /// Reads and deserializes a typed value. A value that no longer matches
    /// `T` counts as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get(key).await?;
        match serde_json::from_value(value) {
            Ok(typed) => {
                trace!(key = %key, "Cache hit");
                Some(typed)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Cached value has unexpected shape");
                None
            }
        }
    }

    /// Serializes and stores a typed value.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(value) => self.set(key, &value, ttl).await,
            Err(e) => warn!(key = %key, error = %e, "Cache value serialization failed"),
        }
    }
}
