//! Realtime session relay.
//!
//! Participants join named rooms over WebSocket; the room coordinator keeps the
//! membership consistent and fans document, language, typing and membership
//! events out to the connections of each room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
