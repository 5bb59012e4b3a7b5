//! Idobata chat hub server.
//!
//! Clients claim a display identity over a WebSocket, exchange public and
//! direct messages and can attach an avatar over HTTP.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin idobata-server
//! cargo run --bin idobata-server -- --host 0.0.0.0 --port 3000 --static-dir static
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use idobata_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryHistoryStore, InMemoryIdentityRegistry},
    },
    ui::{Server, ServerConfig},
    usecase::{
        ConnectParticipantUseCase, FetchHistoryUseCase, JoinChatUseCase, LeaveChatUseCase,
        ListActiveUsersUseCase, RenameParticipantUseCase, SendMessageUseCase, UpdateAvatarUseCase,
    },
};
use idobata_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "idobata-server")]
#[command(about = "WebSocket chat hub with direct messages and bounded history", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Directory where uploaded avatars are stored
    #[arg(long, default_value = "uploads/avatars")]
    avatar_dir: PathBuf,

    /// Optional directory with the browser UI, served at the root
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Stores
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create the in-memory stores
    let registry = Arc::new(InMemoryIdentityRegistry::new());
    let history = Arc::new(InMemoryHistoryStore::new());

    // 2. Create the MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create the UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let join_chat_usecase = Arc::new(JoinChatUseCase::new(
        registry.clone(),
        history.clone(),
        message_pusher.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        registry.clone(),
        history.clone(),
        message_pusher.clone(),
    ));
    let rename_participant_usecase = Arc::new(RenameParticipantUseCase::new(
        registry.clone(),
        history.clone(),
        message_pusher.clone(),
    ));
    let fetch_history_usecase = Arc::new(FetchHistoryUseCase::new(
        registry.clone(),
        history.clone(),
        message_pusher.clone(),
    ));
    let leave_chat_usecase = Arc::new(LeaveChatUseCase::new(
        registry.clone(),
        history.clone(),
        message_pusher.clone(),
    ));
    let update_avatar_usecase = Arc::new(UpdateAvatarUseCase::new(
        registry.clone(),
        message_pusher.clone(),
    ));
    let list_active_users_usecase = Arc::new(ListActiveUsersUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
        connect_participant_usecase,
        join_chat_usecase,
        send_message_usecase,
        rename_participant_usecase,
        fetch_history_usecase,
        leave_chat_usecase,
        update_avatar_usecase,
        list_active_users_usecase,
        ServerConfig {
            avatar_dir: args.avatar_dir,
            static_dir: args.static_dir,
        },
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
