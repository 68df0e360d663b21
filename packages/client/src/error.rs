//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    /// Input line could not be parsed as a command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Outgoing event could not be encoded
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}
