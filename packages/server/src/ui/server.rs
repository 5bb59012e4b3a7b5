//! Server execution logic.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::usecase::{
    ConnectParticipantUseCase, FetchHistoryUseCase, JoinChatUseCase, LeaveChatUseCase,
    ListActiveUsersUseCase, RenameParticipantUseCase, SendMessageUseCase, UpdateAvatarUseCase,
};

use super::{
    handler::http::{
        MAX_AVATAR_BYTES, get_active_users, health_check, remove_avatar, upload_avatar,
    },
    handler::websocket::websocket_handler,
    signal::shutdown_signal,
    state::AppState,
};

/// File-system locations used by the HTTP surface
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory where uploaded avatars are stored (served at `/avatars`)
    pub avatar_dir: PathBuf,
    /// Optional directory with the browser UI, served at the root
    pub static_dir: Option<PathBuf>,
}

/// WebSocket chat hub server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_participant_usecase,
///     join_chat_usecase,
///     send_message_usecase,
///     rename_participant_usecase,
///     fetch_history_usecase,
///     leave_chat_usecase,
///     update_avatar_usecase,
///     list_active_users_usecase,
///     config,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    join_chat_usecase: Arc<JoinChatUseCase>,
    send_message_usecase: Arc<SendMessageUseCase>,
    rename_participant_usecase: Arc<RenameParticipantUseCase>,
    fetch_history_usecase: Arc<FetchHistoryUseCase>,
    leave_chat_usecase: Arc<LeaveChatUseCase>,
    update_avatar_usecase: Arc<UpdateAvatarUseCase>,
    list_active_users_usecase: Arc<ListActiveUsersUseCase>,
    config: ServerConfig,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_participant_usecase: Arc<ConnectParticipantUseCase>,
        join_chat_usecase: Arc<JoinChatUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        rename_participant_usecase: Arc<RenameParticipantUseCase>,
        fetch_history_usecase: Arc<FetchHistoryUseCase>,
        leave_chat_usecase: Arc<LeaveChatUseCase>,
        update_avatar_usecase: Arc<UpdateAvatarUseCase>,
        list_active_users_usecase: Arc<ListActiveUsersUseCase>,
        config: ServerConfig,
    ) -> Self {
        Self {
            connect_participant_usecase,
            join_chat_usecase,
            send_message_usecase,
            rename_participant_usecase,
            fetch_history_usecase,
            leave_chat_usecase,
            update_avatar_usecase,
            list_active_users_usecase,
            config,
        }
    }

    /// Run the chat hub server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_participant_usecase: self.connect_participant_usecase,
            join_chat_usecase: self.join_chat_usecase,
            send_message_usecase: self.send_message_usecase,
            rename_participant_usecase: self.rename_participant_usecase,
            fetch_history_usecase: self.fetch_history_usecase,
            leave_chat_usecase: self.leave_chat_usecase,
            update_avatar_usecase: self.update_avatar_usecase,
            list_active_users_usecase: self.list_active_users_usecase,
            avatar_dir: self.config.avatar_dir.clone(),
        });

        // Define handlers
        let mut app = Router::new()
            // WebSocket endpoint
            .route("/ws", get(websocket_handler))
            // HTTP endpoints
            .route("/api/health", get(health_check))
            .route("/api/users", get(get_active_users))
            .route(
                "/upload-avatar",
                // headroom over the payload cap for the multipart envelope
                post(upload_avatar).layer(DefaultBodyLimit::max(MAX_AVATAR_BYTES + 64 * 1024)),
            )
            .route("/remove-avatar", post(remove_avatar))
            // stored avatars
            .nest_service("/avatars", ServeDir::new(&self.config.avatar_dir))
            .with_state(app_state)
            .layer(TraceLayer::new_for_http());

        // Optional browser UI
        if let Some(static_dir) = &self.config.static_dir {
            app = app.fallback_service(
                ServeDir::new(static_dir).append_index_html_on_directories(true),
            );
        }

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat hub server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // ConnectInfo supplies the peer address the identity binding keys on
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
