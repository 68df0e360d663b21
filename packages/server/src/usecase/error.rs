//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{MessagePushError, ValueObjectError};

/// Reasons an inbound event had no effect or failed to fan out.
///
/// None of these are reported back to the sender; the gateway logs them.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("invalid event: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("connection is not joined to room '{room}'")]
    NotAffiliated { room: String },

    #[error(transparent)]
    Push(#[from] MessagePushError),

    #[error("failed to encode outbound event: {0}")]
    Encode(#[from] serde_json::Error),
}
