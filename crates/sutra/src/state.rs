//! Application state.
//!
//! Holds the three record services and the cache store they share. The
//! record store and cache engine behind them are picked by feature flags;
//! each combination has its own `AppState::new` below.

use std::sync::Arc;

use sutra_core::cache::CacheEngine;
use sutra_core::storage::{AttendanceRepository, EmployeeRepository};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::services::{AttendanceService, DashboardService, EmployeeService};

/// Shared application state.
///
/// Cloned for each request handler. Every clone points at the same record
/// store and cache store.
#[derive(Clone)]
pub struct AppState {
    pub employees: EmployeeService,
    pub attendance: AttendanceService,
    pub dashboard: DashboardService,
    /// Shared by all three services; also used for startup flush and shutdown.
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Wires the services over one record store and one connected cache.
    ///
    /// Fails when the cache engine does not answer its liveness probe.
    async fn build<R>(
        repo: Arc<R>,
        engine: Arc<dyn CacheEngine>,
        config: &Config,
    ) -> anyhow::Result<Self>
    where
        R: EmployeeRepository + AttendanceRepository + 'static,
    {
        let cache =
            CacheStore::connect(engine, config.cache_scan_count, config.cache_timeout()).await?;
        let cache = Arc::new(cache);
        let employees: Arc<dyn EmployeeRepository> = repo.clone();
        let attendance: Arc<dyn AttendanceRepository> = repo;

        Ok(Self {
            employees: EmployeeService::new(employees.clone(), attendance.clone(), cache.clone()),
            attendance: AttendanceService::new(
                employees.clone(),
                attendance.clone(),
                cache.clone(),
            ),
            dashboard: DashboardService::new(employees, attendance, cache.clone()),
            cache,
        })
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryEngine;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let engine = Arc::new(MemoryEngine::new());
            Self::build(repo, engine, config).await
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisEngine;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let engine = RedisEngine::connect(&config.redis_url, config.cache_timeout()).await?;
            let engine = Arc::new(engine);
            Self::build(repo, engine, config).await
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryEngine;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let engine = Arc::new(MemoryEngine::new());
            Self::build(repo, engine, config).await
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisEngine;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let engine = RedisEngine::connect(&config.redis_url, config.cache_timeout()).await?;
            let engine = Arc::new(engine);
            Self::build(repo, engine, config).await
        }
    }
}
