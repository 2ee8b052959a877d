mod response;

pub use response::{ApiResponse, ErrorResponse, ListResponse};
