//! In-memory record store.
//!
//! Enforces the same uniqueness constraints as the SQLite schema so service
//! behavior does not depend on the backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use sutra::storage::inmemory::InMemoryRepository;
//!
//! let repo = std::sync::Arc::new(InMemoryRepository::new());
//! let employees: std::sync::Arc<dyn EmployeeRepository> = repo.clone();
//! let attendance: std::sync::Arc<dyn AttendanceRepository> = repo;
//! ```

mod repository;

pub use repository::InMemoryRepository;
