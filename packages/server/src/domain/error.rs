//! Domain errors.

use thiserror::Error;

/// Errors raised when constructing value objects from raw input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room key must not be empty")]
    EmptyRoomKey,

    #[error("participant name must not be empty")]
    EmptyParticipantName,
}

/// Errors raised by a `MessagePusher` implementation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No outbound channel is registered for the connection
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    /// The outbound channel exists but the send failed (receiver dropped)
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
