//! Server state shared by the handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, FetchHistoryUseCase, JoinChatUseCase, LeaveChatUseCase,
    ListActiveUsersUseCase, RenameParticipantUseCase, SendMessageUseCase, UpdateAvatarUseCase,
};

/// Shared application state
pub struct AppState {
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    pub send_message_usecase: Arc<SendMessageUseCase>,
    pub rename_participant_usecase: Arc<RenameParticipantUseCase>,
    pub fetch_history_usecase: Arc<FetchHistoryUseCase>,
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    pub update_avatar_usecase: Arc<UpdateAvatarUseCase>,
    pub list_active_users_usecase: Arc<ListActiveUsersUseCase>,
    /// Directory where uploaded avatars are stored
    pub avatar_dir: PathBuf,
}
