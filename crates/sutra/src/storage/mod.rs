//! Record-store backends.
//!
//! Concrete implementations of the repository traits defined in
//! `sutra_core::storage`, selected at compile time:
//!
//! - `inmemory` (default): process-local maps, lost on restart
//! - `sqlite`: SQLite via `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive.
//!
//! # Examples
//!
//! Build with SQLite and Redis:
//! ```bash
//! cargo build -p sutra --no-default-features --features sqlite,redis
//! ```

#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!(
    "Features 'inmemory' and 'sqlite' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p sutra --no-default-features --features sqlite,memory"
);

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
