pub mod attendance;
pub mod dashboard;
pub mod employees;
pub mod error;
pub mod health;

pub use error::AppError;
