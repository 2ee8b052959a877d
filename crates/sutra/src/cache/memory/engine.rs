//! In-memory cache engine.
//!
//! Keys live in an ordered map so a scan cursor can simply be the last key
//! examined: the next page resumes strictly after it, which stays correct
//! even when keys from earlier pages were deleted in between.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sutra_core::cache::{pattern_matches, CacheEngine, Result, ScanPage};

/// A stored value and its expiry deadline.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn new(value: &str, ttl: Duration) -> Self {
        Self {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache engine with lazy TTL expiry.
///
/// Expired entries are never returned. They are dropped when read, when a
/// scan examines them, and in a sweep before every write, so the map holds
/// at most the live keys plus whatever expired since the last write.
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    entries: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    /// Number of stored entries, expired or not.
    #[cfg(test)]
    pub async fn stored(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl CacheEngine for MemoryEngine {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired(Instant::now()) => {
                entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, entry| !entry.is_expired(now));
        entries.insert(key.to_string(), Entry::new(value, ttl));
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }

    async fn scan(&self, cursor: Option<&str>, pattern: &str, count: usize) -> Result<ScanPage> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        let lower = match cursor {
            Some(after) => Bound::Excluded(after),
            None => Bound::Unbounded,
        };
        let mut remaining = entries.range::<str, _>((lower, Bound::Unbounded));

        let mut keys = Vec::new();
        let mut expired = Vec::new();
        let mut last_examined = None;
        for (key, entry) in remaining.by_ref().take(count.max(1)) {
            last_examined = Some(key.clone());
            if entry.is_expired(now) {
                expired.push(key.clone());
            } else if pattern_matches(pattern, key) {
                keys.push(key.clone());
            }
        }

        let next = match remaining.next() {
            Some(_) => last_examined,
            None => None,
        };
        for key in &expired {
            entries.remove(key);
        }
        Ok(ScanPage { keys, next })
    }

    async fn flush(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    async fn scan_all(engine: &MemoryEngine, pattern: &str, count: usize) -> (Vec<String>, usize) {
        let mut cursor: Option<String> = None;
        let mut keys = Vec::new();
        let mut pages = 0;
        loop {
            let page = engine.scan(cursor.as_deref(), pattern, count).await.unwrap();
            pages += 1;
            keys.extend(page.keys);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        (keys, pages)
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let engine = MemoryEngine::new();
        engine.set_ex("employee:EMP-1", "{\"a\":1}", TTL).await.unwrap();
        assert_eq!(
            engine.get("employee:EMP-1").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let engine = MemoryEngine::new();
        assert_eq!(engine.get("employee:nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_whole_value() {
        let engine = MemoryEngine::new();
        engine.set_ex("k", "first", TTL).await.unwrap();
        engine.set_ex("k", "second", TTL).await.unwrap();
        assert_eq!(engine.get("k").await.unwrap().as_deref(), Some("second"));
        assert_eq!(engine.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let engine = MemoryEngine::new();
        engine
            .set_ex("dashboard:summary", "{}", Duration::from_millis(50))
            .await
            .unwrap();
        assert!(engine.get("dashboard:summary").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(engine.get("dashboard:summary").await.unwrap().is_none());
        assert_eq!(engine.len().await, 0);
    }

    #[tokio::test]
    async fn test_delete_ignores_missing_keys() {
        let engine = MemoryEngine::new();
        engine.set_ex("a", "1", TTL).await.unwrap();
        engine.set_ex("b", "2", TTL).await.unwrap();

        engine
            .delete(&["a".to_string(), "missing".to_string()])
            .await
            .unwrap();

        assert!(engine.get("a").await.unwrap().is_none());
        assert!(engine.get("b").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_scan_pages_through_all_matches() {
        let engine = MemoryEngine::new();
        for i in 0..7 {
            engine
                .set_ex(&format!("employees:list:{:08x}", i), "[]", TTL)
                .await
                .unwrap();
        }
        engine.set_ex("employee:EMP-1", "{}", TTL).await.unwrap();
        engine.set_ex("dashboard:summary", "{}", TTL).await.unwrap();

        let (keys, pages) = scan_all(&engine, "employees:list:*", 2).await;

        assert_eq!(keys.len(), 7);
        assert!(keys.iter().all(|k| k.starts_with("employees:list:")));
        assert!(pages >= 4);
    }

    #[tokio::test]
    async fn test_scan_page_may_be_empty_before_the_end() {
        let engine = MemoryEngine::new();
        engine.set_ex("a:1", "x", TTL).await.unwrap();
        engine.set_ex("a:2", "x", TTL).await.unwrap();
        engine.set_ex("z:1", "x", TTL).await.unwrap();

        let page = engine.scan(None, "z:*", 2).await.unwrap();
        assert!(page.keys.is_empty());
        assert!(!page.is_last());

        let page = engine.scan(page.next.as_deref(), "z:*", 2).await.unwrap();
        assert_eq!(page.keys, vec!["z:1".to_string()]);
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_scan_survives_deletes_between_pages() {
        let engine = MemoryEngine::new();
        for i in 0..5 {
            engine
                .set_ex(&format!("attendance:list:{}", i), "[]", TTL)
                .await
                .unwrap();
        }

        let mut cursor: Option<String> = None;
        let mut deleted = 0;
        loop {
            let page = engine
                .scan(cursor.as_deref(), "attendance:*", 2)
                .await
                .unwrap();
            deleted += page.keys.len();
            engine.delete(&page.keys).await.unwrap();
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        assert_eq!(deleted, 5);
        assert_eq!(engine.len().await, 0);
    }

    #[tokio::test]
    async fn test_scan_skips_expired_entries() {
        let engine = MemoryEngine::new();
        engine
            .set_ex("dashboard:summary", "{}", Duration::from_millis(10))
            .await
            .unwrap();
        engine
            .set_ex("dashboard:attendance_summary", "[]", TTL)
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        let (keys, _) = scan_all(&engine, "dashboard:*", 10).await;
        assert_eq!(keys, vec!["dashboard:attendance_summary".to_string()]);
        assert_eq!(engine.stored().await, 1);
    }

    #[tokio::test]
    async fn test_writes_sweep_expired_entries() {
        let engine = MemoryEngine::new();
        for i in 0..5000 {
            engine
                .set_ex(&format!("employees:list:{:08x}", i), "[]", Duration::from_millis(5))
                .await
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(50)).await;

        for i in 0..10 {
            engine
                .set_ex(&format!("employee:EMP-{}", i), "{}", TTL)
                .await
                .unwrap();
        }
        let (keys, _) = scan_all(&engine, "employee:*", 100).await;

        assert_eq!(keys.len(), 10);
        assert_eq!(engine.stored().await, 10);
    }

    #[tokio::test]
    async fn test_scan_drops_expired_entries_it_passes() {
        let engine = MemoryEngine::new();
        for i in 0..20 {
            engine
                .set_ex(&format!("attendance:list:{:02}", i), "[]", Duration::from_millis(5))
                .await
                .unwrap();
        }

        tokio::time::sleep(Duration::from_millis(30)).await;

        // A pattern that matches nothing still clears what it walks over.
        let (keys, _) = scan_all(&engine, "payroll:*", 3).await;
        assert!(keys.is_empty());
        assert_eq!(engine.stored().await, 0);
    }

    #[tokio::test]
    async fn test_scan_empty_engine() {
        let engine = MemoryEngine::new();
        let page = engine.scan(None, "*", 100).await.unwrap();
        assert_eq!(page, ScanPage::default());
    }

    #[tokio::test]
    async fn test_flush_removes_everything() {
        let engine = MemoryEngine::new();
        engine.set_ex("employee:EMP-1", "{}", TTL).await.unwrap();
        engine.set_ex("dashboard:summary", "{}", TTL).await.unwrap();

        engine.flush().await.unwrap();

        assert_eq!(engine.len().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let engine = MemoryEngine::new();
        let clone = engine.clone();
        engine.set_ex("k", "v", TTL).await.unwrap();
        assert_eq!(clone.get("k").await.unwrap().as_deref(), Some("v"));
    }
}
