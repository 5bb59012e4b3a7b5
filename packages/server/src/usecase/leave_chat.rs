//! UseCase: leave and disconnect handling.
//!
//! Explicit `leave` events and transport-level disconnects share this path.
//! It is idempotent: when both race, the registry removal happens once and
//! the second call is a no-op.

use std::sync::Arc;

use idobata_shared::time::utc_now_rfc3339;

use crate::domain::{
    ChannelKey, ConnectionId, HistoryStore, IdentityRegistry, MessagePusher, MessageRecord,
};
use crate::infrastructure::dto::websocket::{MessageEvent, UserListEvent};

/// Leave/disconnect use case
pub struct LeaveChatUseCase {
    registry: Arc<dyn IdentityRegistry>,
    history: Arc<dyn HistoryStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveChatUseCase {
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

    /// Tear down one connection.
    ///
    /// The departure notice is only sent when the identity's last connection
    /// goes away and the identity ever had a name.
    pub async fn execute(&self, connection: &ConnectionId) {
        // 1. Remove the binding; a second call for the same connection
        //    finds nothing and returns
        let Some(identity) = self.registry.disconnect(connection).await else {
            return;
        };
        self.message_pusher.unregister(connection).await;
        tracing::info!("Connection '{}' disconnected", connection);

        // 2. Other tabs of the same identity may still be open
        if self.registry.is_active(&identity).await {
            return;
        }

        // 3. Unnamed identities never appeared in the roster; leave quietly
        let name = self.registry.name_for(&identity).await.unwrap_or_default();
        if name.is_empty() {
            return;
        }

        // 4. Persist and broadcast the departure notice
        let notice = MessageRecord::system(format!("{} left", name), utc_now_rfc3339());
        self.history
            .append(&ChannelKey::public(), notice.clone())
            .await;
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&MessageEvent::from(notice)).unwrap())
            .await;

        // 5. Broadcast the updated roster
        let roster = UserListEvent::new(self.registry.list_active().await);
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&roster).unwrap())
            .await;
    }
}
