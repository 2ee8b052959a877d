//! SQLite storage backend implementation.
//!
//! Implements the employee and attendance repository traits using `rusqlite`
//! for synchronous operations and `tokio-rusqlite` for async wrapping.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
