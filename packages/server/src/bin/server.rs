//! Coderoom relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coderoom-server
//! cargo run --bin coderoom-server -- --host 0.0.0.0 --port 5000 --relay-policy affiliated
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use coderoom_server::{
    config::{CoordinatorConfig, RelayPolicy, ServerConfig},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::Server,
    usecase::RoomCoordinator,
};
use coderoom_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "coderoom-server")]
#[command(about = "Realtime room relay for collaborative editing", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = 5000)]
    port: u16,

    /// Who may relay code/language/typing events into a room
    #[arg(long, value_enum, default_value_t = RelayPolicy::Open)]
    relay_policy: RelayPolicy,

    /// Also send codeUpdate back to the connection that sent the change
    #[arg(long)]
    echo_code: bool,

    /// Directory of a built frontend to serve at `/`
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            coordinator: CoordinatorConfig {
                relay_policy: args.relay_policy,
                echo_code_to_sender: args.echo_code,
            },
            static_dir: args.static_dir,
        }
    }
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::debug!("Starting with {:?}", config);

    // 1. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 2. RoomCoordinator
    let coordinator = Arc::new(RoomCoordinator::new(
        message_pusher,
        Arc::new(SystemClock),
        config.coordinator,
    ));

    // 3. Server
    let server = Server::new(coordinator, config.static_dir.clone());
    if let Err(e) = server.run(&config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
