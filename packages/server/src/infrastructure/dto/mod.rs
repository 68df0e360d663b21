//! Data Transfer Objects (DTOs).
//!
//! DTOs are organized by protocol:
//! - `websocket`: named-event envelopes exchanged over `/ws`
//! - `http`: HTTP API response DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
