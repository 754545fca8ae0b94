//! Shared error type across pairlink crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Unsupported protocol version.
    UnsupportedVersion,
    /// Upstream collaborator unreachable.
    Unavailable,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Unavailable => "UNAVAILABLE",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PairlinkError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum PairlinkError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PairlinkError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            PairlinkError::BadRequest(_) => ClientCode::BadRequest,
            PairlinkError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            PairlinkError::Unavailable(_) => ClientCode::Unavailable,
            PairlinkError::Internal(_) => ClientCode::Internal,
        }
    }
}
