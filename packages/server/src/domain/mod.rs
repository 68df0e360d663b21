//! Domain layer.
//!
//! Value objects, the `Room` entity, the room registry holding the membership
//! and affiliation tables, and the `MessagePusher` port through which outbound
//! events leave the coordinator.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod registry;
pub mod value_object;

pub use entity::{Affiliation, Room};
pub use error::{MessagePushError, ValueObjectError};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use registry::{Delivery, OutboundEvent, RoomRegistry};
pub use value_object::{ConnectionId, ParticipantName, RoomKey, Timestamp};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
