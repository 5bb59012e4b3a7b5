//! UseCase layer: one use case per protocol operation.
//!
//! Each use case depends on the domain traits only (dependency inversion)
//! and is wired with concrete infrastructure at process start.

mod connect_participant;
mod error;
mod fetch_history;
mod join_chat;
mod leave_chat;
mod list_active_users;
mod rename_participant;
mod send_message;
mod update_avatar;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use error::{SendMessageError, UpdateAvatarError};
pub use fetch_history::FetchHistoryUseCase;
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use list_active_users::ListActiveUsersUseCase;
pub use rename_participant::RenameParticipantUseCase;
pub use send_message::SendMessageUseCase;
pub use update_avatar::UpdateAvatarUseCase;
