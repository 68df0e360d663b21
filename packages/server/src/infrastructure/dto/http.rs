//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Summary of one room for `/api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// Sorted participant names
    pub members: Vec<String>,
    /// Number of attached connections (may exceed `members` when names repeat)
    pub connections: usize,
    /// RFC 3339
    pub created_at: String,
}
