//! Cache engines and the degrading cache store built on them.
//!
//! The engine is selected at compile time:
//!
//! - `memory` (default): in-process map with lazy TTL expiry
//! - `redis`: Redis via a multiplexed connection manager
//!
//! These features are mutually exclusive.

#[cfg(all(feature = "memory", feature = "redis"))]
compile_error!(
    "Features 'memory' and 'redis' are mutually exclusive. \
    Enable only one cache backend at a time."
);

#[cfg(not(any(feature = "memory", feature = "redis")))]
compile_error!(
    "No cache backend selected. Enable 'memory' or 'redis' feature. \
    Example: cargo build -p sutra --no-default-features --features inmemory,redis"
);

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

mod store;

#[cfg(feature = "memory")]
pub use memory::MemoryEngine;

#[cfg(feature = "redis")]
pub use redis_impl::RedisEngine;

pub use store::{CacheStore, DEFAULT_OPERATION_TIMEOUT, DEFAULT_SCAN_COUNT};
