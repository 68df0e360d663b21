//! Terminal participant for the coderoom relay.
//!
//! Joins a room, keeps a local copy of the shared document and mirrors
//! membership, language and typing events to the terminal.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
pub mod runner;
pub mod session;
pub mod ui;

pub use runner::run_client;
