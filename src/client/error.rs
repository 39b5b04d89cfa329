//! Error types for analytics service calls.

use thiserror::Error;

/// Errors surfaced by the analytics client.
///
/// Two families: transport problems (the request never completed) and
/// service problems (the service answered, but not usefully). The
/// client performs no retries; both families propagate to the caller.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Service answered with a non-success HTTP status
    #[error("service returned HTTP {0}")]
    HttpStatus(u16),

    /// Response body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// True for failures where no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Timeout(_) | ClientError::ConnectionFailed(_))
    }

    /// True for failures reported by or attributable to the service.
    pub fn is_service(&self) -> bool {
        !self.is_transport()
    }
}
