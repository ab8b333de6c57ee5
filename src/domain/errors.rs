//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

/// Failure kinds reported by the Completion Service client.
///
/// The orchestrator never re-wraps these: a `Timeout` from the client reaches
/// the caller as `DomainError::CompletionService(CompletionError::Timeout)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("completion service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("completion service timed out")]
    Timeout,

    #[error("completion quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("completion request cancelled")]
    Cancelled,

    /// The service answered, but not with a completion we can read (no choices, bad JSON).
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum DomainError {
    /// Caller-fixable: empty query/answers, out-of-range config.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Completion text could not be parsed into the expected shape. Not retried.
    #[error("Malformed completion: {0}")]
    MalformedCompletion(String),

    #[error("Completion service error: {0}")]
    CompletionService(#[from] CompletionError),

    #[error("Frontend error: {0}")]
    Frontend(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    /// True when the failure is a cancellation signal rather than a real error.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            DomainError::CompletionService(CompletionError::Cancelled)
        )
    }

    /// True for failures of the external dependency (the caller may retry).
    pub fn is_service_failure(&self) -> bool {
        matches!(self, DomainError::CompletionService(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_error_keeps_kind() {
        let err: DomainError = CompletionError::Timeout.into();
        assert!(matches!(
            err,
            DomainError::CompletionService(CompletionError::Timeout)
        ));
        assert_eq!(
            err.to_string(),
            "Completion service error: completion service timed out"
        );
    }

    #[test]
    fn test_is_cancelled() {
        assert!(DomainError::from(CompletionError::Cancelled).is_cancelled());
        assert!(!DomainError::from(CompletionError::Timeout).is_cancelled());
        assert!(!DomainError::InvalidInput("x".into()).is_cancelled());
    }

    #[test]
    fn test_is_service_failure() {
        assert!(DomainError::from(CompletionError::QuotaExceeded("daily".into())).is_service_failure());
        assert!(!DomainError::MalformedCompletion("empty".into()).is_service_failure());
    }
}
