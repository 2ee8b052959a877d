//! Redis error mapping to CacheError.

use sutra_core::cache::CacheError;

/// Maps Redis errors to CacheError.
///
/// Transport failures become `ConnectionFailed` so the store can report the
/// engine as unreachable; everything else is an operation failure.
pub fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal()
        || err.is_timeout()
        || err.is_connection_dropped()
        || err.is_io_error()
    {
        CacheError::ConnectionFailed(err.to_string())
    } else {
        CacheError::OperationFailed(err.to_string())
    }
}
