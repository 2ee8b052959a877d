//! Maps record-store errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404
/// - `AlreadyExists` -> 409
/// - `ConnectionFailed` -> 503
/// - `QueryFailed`, `Serialization`, `InvalidData` -> 500
///
/// Stored data that fails to decode is a server fault, not a client one.
///
/// # Examples
///
/// ```
/// use sutra_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::AlreadyExists {
///     entity_type: "Employee",
///     id: "EMP-001".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 409);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_)
        | RepositoryError::Serialization(_)
        | RepositoryError::InvalidData(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Employee",
            id: "EMP-9".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Employee",
            id: "asha@example.com".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("unable to open database".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
    }

    #[test]
    fn test_data_errors_map_to_500() {
        for error in [
            RepositoryError::QueryFailed("syntax error".to_string()),
            RepositoryError::Serialization("bad uuid".to_string()),
            RepositoryError::InvalidData("unknown status".to_string()),
        ] {
            assert_eq!(repository_error_to_status_code(&error), 500);
        }
    }
}
