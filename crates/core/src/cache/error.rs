use std::time::Duration;

use thiserror::Error;

/// Failures reported by a cache engine.
///
/// The cache store logs and absorbs all of these; the record services only
/// ever observe a miss or a skipped write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The engine could not be reached or dropped the connection.
    #[error("Cache engine unreachable: {0}")]
    ConnectionFailed(String),
    /// The engine answered with an error reply.
    #[error("Cache command rejected: {0}")]
    OperationFailed(String),
    /// The engine did not answer in time. Handled like an unreachable engine.
    #[error("Cache {operation} got no reply within {limit:?}")]
    Timeout {
        operation: &'static str,
        limit: Duration,
    },
    /// A value could not be turned into stored text.
    #[error("Cache value encoding failed: {0}")]
    Serialization(String),
}

impl CacheError {
    /// Whether the engine itself is unavailable, as opposed to rejecting one
    /// command.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            CacheError::ConnectionFailed(_) | CacheError::Timeout { .. }
        )
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stalled_scan_names_operation_and_limit() {
        let error = CacheError::Timeout {
            operation: "SCAN",
            limit: Duration::from_millis(250),
        };
        assert_eq!(error.to_string(), "Cache SCAN got no reply within 250ms");
        assert!(error.is_unreachable());
    }

    #[test]
    fn test_rejected_set_ex_is_not_unreachable() {
        let error = CacheError::OperationFailed(
            "ERR invalid expire time in 'setex' command".to_string(),
        );
        assert_eq!(
            error.to_string(),
            "Cache command rejected: ERR invalid expire time in 'setex' command"
        );
        assert!(!error.is_unreachable());
    }

    #[test]
    fn test_refused_connection_is_unreachable() {
        let error = CacheError::ConnectionFailed("Connection refused (os error 111)".to_string());
        assert!(error.is_unreachable());
        assert!(error.to_string().starts_with("Cache engine unreachable"));
    }
}
