//! Idobata CLI chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-client -- --nickname Sam
//! cargo run --bin idobata-client -- --url ws://example.org:8080/ws --nickname Sam
//! ```

use clap::Parser;

use idobata_client::session::run_client_session;
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-client")]
#[command(about = "CLI client for the Idobata chat hub", long_about = None)]
struct Args {
    /// WebSocket URL of the chat server
    #[arg(short, long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Nickname to join with
    #[arg(short, long, default_value = "Guest")]
    nickname: String,
}

#[tokio::main]
async fn main() {
    // Keep the terminal quiet by default; RUST_LOG overrides
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = run_client_session(&args.url, &args.nickname).await {
        tracing::error!("Client error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
