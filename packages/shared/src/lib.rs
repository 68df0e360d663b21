//! Utilities shared by the coderoom server and client.

pub mod logger;
pub mod time;
