//! Redis cache engine.
//!
//! Pattern enumeration uses `SCAN ... MATCH ... COUNT`, so a single page may
//! hold fewer keys than requested (or none) while iteration continues. The
//! returned cursor is opaque and `"0"` marks the end.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use sutra_core::cache::{CacheEngine, Result, ScanPage};

use super::error::map_redis_error;

/// Redis cache engine over a multiplexed, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisEngine {
    conn: redis::aio::ConnectionManager,
}

impl RedisEngine {
    /// Opens a connection to Redis.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379/0")
    /// * `timeout` - Limit on establishing a connection and on each reply
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let config = redis::aio::ConnectionManagerConfig::new()
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout);
        let conn = redis::aio::ConnectionManager::new_with_config(client, config)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheEngine for RedisEngine {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // Redis expiry granularity here is whole seconds.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(map_redis_error)?;
        Ok(())
    }

    async fn scan(&self, cursor: Option<&str>, pattern: &str, count: usize) -> Result<ScanPage> {
        let mut conn = self.conn.clone();
        let (next, keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor.unwrap_or("0"))
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(count.max(1))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;

        let next = if next == "0" { None } else { Some(next) };
        Ok(ScanPage { keys, next })
    }

    async fn flush(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut conn)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    /// Helper to get Redis URL from environment.
    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/0".to_string())
    }

    /// Skip test if Redis not available.
    async fn get_test_engine() -> Option<RedisEngine> {
        let engine = RedisEngine::connect(&redis_url(), Duration::from_millis(500))
            .await
            .ok()?;
        engine.ping().await.ok()?;
        Some(engine)
    }

    /// Unique namespace per test so runs never collide.
    fn test_prefix() -> String {
        format!("test:redis_engine:{}", Uuid::new_v4())
    }

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_redis_set_and_get() {
        let Some(engine) = get_test_engine().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:employee", test_prefix());
        engine.set_ex(&key, r#"{"employee_id":"EMP-1"}"#, TTL).await.unwrap();

        let value = engine.get(&key).await.unwrap();
        assert_eq!(value.as_deref(), Some(r#"{"employee_id":"EMP-1"}"#));

        engine.delete(&[key]).await.unwrap();
    }

    #[tokio::test]
    async fn test_redis_get_nonexistent() {
        let Some(engine) = get_test_engine().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:missing", test_prefix());
        assert_eq!(engine.get(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_redis_ttl() {
        let Some(engine) = get_test_engine().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let key = format!("{}:ttl", test_prefix());
        engine
            .set_ex(&key, "expiring", Duration::from_secs(1))
            .await
            .unwrap();
        assert!(engine.get(&key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(engine.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_delete_many_and_missing() {
        let Some(engine) = get_test_engine().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let prefix = test_prefix();
        let a = format!("{}:a", prefix);
        let b = format!("{}:b", prefix);
        engine.set_ex(&a, "1", TTL).await.unwrap();
        engine.set_ex(&b, "2", TTL).await.unwrap();

        engine
            .delete(&[a.clone(), b.clone(), format!("{}:never", prefix)])
            .await
            .unwrap();
        engine.delete(&[]).await.unwrap();

        assert!(engine.get(&a).await.unwrap().is_none());
        assert!(engine.get(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_redis_scan_iterates_until_cursor_zero() {
        let Some(engine) = get_test_engine().await else {
            eprintln!("Skipping test: Redis not available");
            return;
        };

        let prefix = test_prefix();
        let mut expected = Vec::new();
        for i in 0..25 {
            let key = format!("{}:list:{}", prefix, i);
            engine.set_ex(&key, "[]", TTL).await.unwrap();
            expected.push(key);
        }
        let other = format!("{}:other", prefix);
        engine.set_ex(&other, "{}", TTL).await.unwrap();

        let pattern = format!("{}:list:*", prefix);
        let mut cursor: Option<String> = None;
        let mut found = Vec::new();
        loop {
            let page = engine.scan(cursor.as_deref(), &pattern, 5).await.unwrap();
            found.extend(page.keys);
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // SCAN may return a key more than once.
        found.sort();
        found.dedup();
        expected.sort();
        assert_eq!(found, expected);

        expected.push(other);
        engine.delete(&expected).await.unwrap();
    }
}
