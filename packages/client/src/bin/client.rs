//! Terminal participant for the coderoom relay.
//!
//! Joins a room and appends each input line to the shared document.
//! Automatically reconnects and re-joins on disconnection (max 5 attempts with
//! 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin coderoom-client -- --room abc123 --name alice
//! ```

use clap::Parser;

use coderoom_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "coderoom-client")]
#[command(about = "Terminal participant for a coderoom relay", long_about = None)]
struct Args {
    /// Room to join
    #[arg(short = 'r', long)]
    room: String,

    /// Display name in the room
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket URL of the relay
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:5000/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    if args.room.is_empty() || args.name.is_empty() {
        eprintln!("--room and --name must not be empty");
        std::process::exit(2);
    }

    if let Err(e) = coderoom_client::run_client(args.url, args.room, args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
