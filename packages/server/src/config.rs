//! Runtime configuration.

use std::path::PathBuf;

use clap::ValueEnum;

/// Which connections may relay events into a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RelayPolicy {
    /// Any connection may relay into any non-empty room key
    #[default]
    Open,
    /// Only connections currently joined to the room may relay into it
    Affiliated,
}

/// Behaviour switches of the room coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorConfig {
    pub relay_policy: RelayPolicy,
    /// Also deliver `codeUpdate` back to the connection that sent it
    pub echo_code_to_sender: bool,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub coordinator: CoordinatorConfig,
    /// Directory of a built frontend to serve at `/`
    pub static_dir: Option<PathBuf>,
}
