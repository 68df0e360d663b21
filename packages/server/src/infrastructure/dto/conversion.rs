//! Conversion logic between DTOs and domain entities.

use coderoom_shared::time::timestamp_to_rfc3339;

use crate::domain::{OutboundEvent, Room};
use crate::infrastructure::dto::{http::RoomSummaryDto, websocket::ServerEvent};

// ========================================
// Domain → DTO
// ========================================

impl From<OutboundEvent> for ServerEvent {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::MembersChanged(names) => {
                Self::UserJoined(names.into_iter().map(|n| n.into_string()).collect())
            }
            OutboundEvent::CodeUpdated(code) => Self::CodeUpdate(code),
            OutboundEvent::LanguageChanged(language) => Self::LanguageUpdate(language),
            OutboundEvent::TypingChanged(name) => {
                Self::UserTyping(name.map(|n| n.into_string()).unwrap_or_default())
            }
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.key.as_str().to_string(),
            members: room
                .members()
                .iter()
                .map(|n| n.as_str().to_string())
                .collect(),
            connections: room.connection_count(),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        }
    }
}
