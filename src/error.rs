//! Error types for ledgershim.

use thiserror::Error;

/// Main error type for all ledgershim operations.
///
/// Identity and key-encoding errors are typically raised inside a handler;
/// the [`Dispatcher`](crate::dispatch::Dispatcher) is the single error
/// boundary that converts any of these into a failure
/// [`Response`](crate::dispatch::Response).
#[derive(Debug, Error)]
pub enum ShimError {
    /// The submitter credential is not a valid PEM-encoded X.509 certificate.
    #[error("malformed submitter credential: {0}")]
    MalformedCredential(String),

    /// A required certificate extension is absent.
    #[error("certificate extension missing: {0}")]
    MissingExtension(&'static str),

    /// Invalid argument to the composite key encoder.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No handler registered for the requested function name.
    ///
    /// The display string is the exact message surfaced to the transaction
    /// submitter on a dispatch miss.
    #[error("No function of name:{0} found")]
    HandlerNotFound(String),

    /// A handler failed with an application-supplied message.
    #[error("{0}")]
    HandlerExecution(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A state value or peer payload was not valid UTF-8.
    #[error("invalid UTF-8 payload: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The host transport reported a failure.
    #[error("host transport error: {0}")]
    Transport(String),
}

/// Result type alias using ShimError.
pub type Result<T> = std::result::Result<T, ShimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_not_found_message() {
        let err = ShimError::HandlerNotFound("bar".to_string());
        assert_eq!(err.to_string(), "No function of name:bar found");
    }

    #[test]
    fn test_handler_execution_message_is_transparent() {
        let err = ShimError::HandlerExecution("asset already exists".to_string());
        assert_eq!(err.to_string(), "asset already exists");
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ShimError = json_err.into();
        assert!(matches!(err, ShimError::Json(_)));
    }
}
