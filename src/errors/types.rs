//! Custom error types for procsync

use std::fmt;

/// Main error type for procsync operations
#[derive(Debug)]
pub enum ConsoleError {
    /// A store replacement addressed a position outside the processor list
    IndexOutOfRange { index: usize, len: usize },
    /// Configuration file errors
    Config(String),
    /// Durable key/value storage errors
    Storage(String),
    /// Network/remote operation errors
    Remote(String),
    /// General I/O errors
    Io(std::io::Error),
    /// Serialization errors
    Serialization(String),
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::IndexOutOfRange { index, len } => write!(
                f,
                "Processor index {} is out of range (list has {} entries)",
                index, len
            ),
            ConsoleError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ConsoleError::Storage(msg) => write!(f, "Storage error: {}", msg),
            ConsoleError::Remote(msg) => write!(f, "Remote operation error: {}", msg),
            ConsoleError::Io(err) => write!(f, "I/O error: {}", err),
            ConsoleError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for ConsoleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConsoleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Io(err)
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<ron::error::SpannedError> for ConsoleError {
    fn from(err: ron::error::SpannedError) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<ron::Error> for ConsoleError {
    fn from(err: ron::Error) -> Self {
        ConsoleError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        ConsoleError::Config(err.to_string())
    }
}

/// Result type alias for procsync operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Failure of a single request against a remote processor.
///
/// Every variant except `Rejected` is a transport-level problem: the processor
/// either never answered or answered with something we could not interpret.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The processor answered non-2xx with a structured `detail` list
    Rejected { status: u16, messages: Vec<String> },
    /// The processor answered non-2xx with a body that is not the expected shape
    MalformedErrorResponse { status: u16, body: String },
    /// `http://{host}:{port}` could not be turned into a URL
    InvalidEndpoint(String),
    /// Connection refused, DNS failure, reset, ...
    Unreachable(String),
    /// No answer within the configured request timeout
    Timeout,
    /// The caller cancelled the request while it was in flight
    Cancelled,
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Rejected { status, messages } => write!(
                f,
                "Processor rejected the request (HTTP {}): {}",
                status,
                messages.join("; ")
            ),
            TransportFailure::MalformedErrorResponse { status, body } => {
                if body.is_empty() {
                    write!(f, "Processor returned HTTP {} without details", status)
                } else {
                    write!(f, "Processor returned HTTP {}: {}", status, body)
                }
            }
            TransportFailure::InvalidEndpoint(msg) => {
                write!(f, "Invalid processor address: {}", msg)
            }
            TransportFailure::Unreachable(msg) => {
                write!(f, "Could not reach the processor: {}", msg)
            }
            TransportFailure::Timeout => write!(f, "The processor did not respond in time"),
            TransportFailure::Cancelled => write!(f, "The request was cancelled"),
        }
    }
}

impl std::error::Error for TransportFailure {}

impl From<TransportFailure> for ConsoleError {
    fn from(err: TransportFailure) -> Self {
        ConsoleError::Remote(err.to_string())
    }
}
