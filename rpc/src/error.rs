use thiserror::Error;

// Error message prefixes
const MSG_FAILED_TO_PREFIX: &str = "Failed to";
const MSG_INVALID_PREFIX: &str = "Invalid";
const MSG_MISSING_PREFIX: &str = "Missing";

/// Result type for the `farmhand_rpc` library
pub type Result<T> = std::result::Result<T, error_stack::Report<Error>>;

/// Error kinds surfaced by the RPC client and its session plumbing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No bearer token could be resolved for the call
    #[error("Not authenticated: no bearer token available")]
    Unauthenticated,

    /// The proxy answered with a non-2xx status
    #[error("{message}")]
    RemoteCallFailed {
        /// HTTP status code returned by the proxy
        status:  u16,
        /// Message extracted from the response body, or the status phrase
        message: String,
    },

    /// The proxy answered 2xx but the body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(String),

    /// A caller-supplied value was rejected before any request was made
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The persistent token store could not be read or written
    #[error("Token store error: {0}")]
    TokenStore(String),
}

impl Error {
    /// Human-readable message without the kind prefix
    ///
    /// For `RemoteCallFailed` this is the message extracted from the response, verbatim.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthenticated => self.to_string(),
            Self::RemoteCallFailed { message, .. } => message.clone(),
            Self::InvalidResponse(s)
            | Self::Transport(s)
            | Self::InvalidArgument(s)
            | Self::Configuration(s)
            | Self::TokenStore(s) => s.clone(),
        }
    }

    /// HTTP status for remote failures
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteCallFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Create an "Invalid X" error
    #[must_use]
    pub fn invalid(what: &str, details: impl std::fmt::Display) -> Self {
        Self::InvalidArgument(format!("{MSG_INVALID_PREFIX} {what}: {details}"))
    }

    /// Create a "Missing X" error
    #[must_use]
    pub fn missing(what: &str) -> Self {
        Self::InvalidArgument(format!("{MSG_MISSING_PREFIX} {what}"))
    }

    /// Create error for token store I/O
    #[must_use]
    pub fn store_failed(
        operation: &str,
        path: &std::path::Path,
        error: impl std::fmt::Display,
    ) -> Self {
        Self::TokenStore(format!(
            "{MSG_FAILED_TO_PREFIX} {operation} {}: {error}",
            path.display()
        ))
    }

    /// Create error for configuration loading
    #[must_use]
    pub fn config_failed(operation: &str, error: impl std::fmt::Display) -> Self {
        Self::Configuration(format!("{MSG_FAILED_TO_PREFIX} {operation}: {error}"))
    }
}
