//! Shared error type across coderelay crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed message.
    BadRequest,
    /// Envelope names a svc/type pair the relay does not handle.
    UnknownEvent,
    /// Unsupported protocol version.
    UnsupportedVersion,
    /// Transport-level failure (handshake, socket, queue).
    Transport,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnknownEvent => "UNKNOWN_EVENT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Transport => "TRANSPORT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RelayError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unknown event: {svc}.{msg_type}")]
    UnknownEvent { svc: String, msg_type: String },
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("transport: {0}")]
    Transport(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl RelayError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            RelayError::BadRequest(_) => ClientCode::BadRequest,
            RelayError::UnknownEvent { .. } => ClientCode::UnknownEvent,
            RelayError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            RelayError::Transport(_) => ClientCode::Transport,
            // config problems only happen at startup and never reach a client
            RelayError::Config(_) => ClientCode::BadRequest,
            RelayError::Internal(_) => ClientCode::Internal,
        }
    }
}
