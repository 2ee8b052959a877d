//! Redis cache engine for shared, multi-instance deployments.

mod engine;
mod error;

pub use engine::RedisEngine;
