//! Gateway: axum router, WebSocket connection handling and HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use handler::websocket::dispatch_event;
pub use server::Server;
pub use signal::shutdown_signal;
