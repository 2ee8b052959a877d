//! Functional core for Sutra HRMS.
//!
//! Pure types, traits and functions shared by the server crate: cache key
//! construction and value encoding, HR domain types and validation, and the
//! record-store contracts. Nothing in this crate performs I/O.

pub mod cache;
pub mod hr;
pub mod serde;
pub mod storage;
