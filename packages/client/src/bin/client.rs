//! Terminal chat client for Hiroba.
//!
//! Connects to a relay server, then reads commands and messages from stdin.
//! There is no automatic reconnection: when the session closes, the client exits.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --nickname alice
//! cargo run --bin hiroba-client -- -n bob --room <room-id>
//! ```

use clap::Parser;

use hiroba_client::{SessionConfig, config::DEFAULT_URL, run_client};
use hiroba_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "WebSocket chat client with rooms, messages and typing indicators", long_about = None)]
struct Args {
    /// Nickname shown to other users
    #[arg(short = 'n', long)]
    nickname: String,

    /// Icon sent along with messages
    #[arg(long)]
    icon: Option<String>,

    /// Room to join right after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = DEFAULT_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let mut config = SessionConfig::new(args.url, args.nickname);
    config.icon = args.icon;

    if let Err(e) = run_client(config, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
