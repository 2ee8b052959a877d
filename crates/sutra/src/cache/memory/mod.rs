//! In-memory cache engine for single-instance deployments and tests.

mod engine;

pub use engine::MemoryEngine;
