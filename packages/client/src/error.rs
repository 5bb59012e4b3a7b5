//! Client error types.

use thiserror::Error;

/// Errors raised by the client session
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to connect to or stay connected with the server
    #[error("connection error: {0}")]
    ConnectionError(String),

    /// Failed to send an event to the server
    #[error("send error: {0}")]
    SendError(String),
}
