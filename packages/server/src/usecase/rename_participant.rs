//! UseCase: rename handling.

use std::sync::Arc;

use idobata_shared::time::utc_now_rfc3339;

use crate::domain::{
    ChannelKey, ConnectionId, HistoryStore, IdentityId, IdentityRegistry, MessagePusher,
    MessageRecord,
};
use crate::infrastructure::dto::websocket::{EventType, MessageEvent, RenamedEvent, UserListEvent};

/// Rename-event use case
pub struct RenameParticipantUseCase {
    registry: Arc<dyn IdentityRegistry>,
    history: Arc<dyn HistoryStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RenameParticipantUseCase {
    pub fn new(
        registry: Arc<dyn IdentityRegistry>,
        history: Arc<dyn HistoryStore>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            history,
            message_pusher,
        }
    }

    /// Execute a rename.
    ///
    /// # Arguments
    ///
    /// * `connection` - The requesting connection
    /// * `identity` - Identity bound to that connection
    /// * `desired_name` - Raw name from the client
    ///
    /// # Returns
    ///
    /// The final (collision-resolved) display name.
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        identity: &IdentityId,
        desired_name: &str,
    ) -> String {
        // 1. Capture the old name before it mutates
        let old_name = self.registry.name_for(identity).await.unwrap_or_default();

        // 2. Assign the new display name
        let final_name = self.registry.set_display_name(identity, desired_name).await;

        // 3. Persist and broadcast the rename notice
        let notice = MessageRecord::system(
            format!("{} is now {}", old_name, final_name),
            utc_now_rfc3339(),
        );
        self.history
            .append(&ChannelKey::public(), notice.clone())
            .await;
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&MessageEvent::from(notice)).unwrap())
            .await;

        // 4. Broadcast the updated roster
        let roster = UserListEvent::new(self.registry.list_active().await);
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&roster).unwrap())
            .await;

        // 5. Acknowledge to the requester
        let renamed = RenamedEvent {
            r#type: EventType::Renamed,
            old: old_name,
            user: final_name.clone(),
            ts: utc_now_rfc3339(),
        };
        self.message_pusher
            .try_send(connection, &serde_json::to_string(&renamed).unwrap())
            .await;

        final_name
    }
}
