//! Outbound port infrastructure
//!
//! The booking core talks to exactly one outbound collaborator, the booking
//! intake transport. Port traits live in the domain crates and extend
//! [`DomainPort`]; every adapter reports failures as a [`PortError`].
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait BookingTransport: DomainPort {
//!     async fn submit(&self, submission: &BookingSubmission) -> Result<BookingReceipt, PortError>;
//! }
//! ```

use thiserror::Error;

/// Error type for port operations
#[derive(Debug, Error)]
pub enum PortError {
    /// The collaborator refused the payload outright
    #[error("Rejected: {message}")]
    Rejected {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data (e.g. car already booked)
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the collaborator failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// The collaborator is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a Rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Rejected {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Rejected error pointing at a single field
    pub fn rejected_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Rejected {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. }
                | PortError::Timeout { .. }
                | PortError::ServiceUnavailable { .. }
        )
    }

    /// Stable machine-readable kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            PortError::Rejected { .. } => "rejected",
            PortError::Conflict { .. } => "conflict",
            PortError::Connection { .. } => "connection",
            PortError::Timeout { .. } => "timeout",
            PortError::ServiceUnavailable { .. } => "service_unavailable",
            PortError::Internal { .. } => "internal",
        }
    }
}

/// Marker trait for all domain ports
///
/// Ports are shared across async tasks, so they must be thread-safe.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_conflict() {
        let error = PortError::Conflict {
            message: "car already booked".to_string(),
        };
        assert!(!error.is_transient());
        assert_eq!(error.kind(), "conflict");
        assert!(error.to_string().contains("already booked"));
    }

    #[test]
    fn test_port_error_transient() {
        let timeout = PortError::Timeout {
            operation: "submit_booking".to_string(),
            duration_ms: 5000,
        };
        assert!(timeout.is_transient());

        assert!(PortError::connection("reset by peer").is_transient());
        assert!(!PortError::internal("bad payload").is_transient());

        let rejected = PortError::rejected_field("Invalid email", "email");
        assert!(!rejected.is_transient());
        assert_eq!(rejected.kind(), "rejected");
    }
}
