//! UseCase: history retrieval.
//!
//! `"all"` returns the public log. Anything else is resolved to a peer
//! identity and returns the canonical DM log between the requester and the
//! peer; the response is keyed by the peer's identity id, which is what the
//! browser client uses for its sidebar channels.

use std::sync::Arc;

use idobata_shared::time::utc_now_rfc3339;

use crate::domain::{
    ChannelKey, ConnectionId, HistoryStore, IdentityId, IdentityRegistry, MessagePusher,
    MessageRecord, PUBLIC_CHANNEL,
};
use crate::infrastructure::dto::websocket::{HistoryEvent, MessageEvent};

/// History-event use case
pub struct FetchHistoryUseCase {
    registry: Arc<dyn IdentityRegistry>,
    history: Arc<dyn HistoryStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl FetchHistoryUseCase {
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

    /// Answer one history request.
    ///
    /// # Arguments
    ///
    /// * `connection` - The requesting connection (receives the snapshot)
    /// * `requester` - Identity bound to that connection
    /// * `channel` - `"all"`, a display name, or a peer identity id
    pub async fn execute(&self, connection: &ConnectionId, requester: &IdentityId, channel: &str) {
        // 1. Public channel
        if channel == PUBLIC_CHANNEL {
            let snapshot = HistoryEvent::new(
                PUBLIC_CHANNEL.to_string(),
                self.history.read(&ChannelKey::public()).await,
            );
            self.message_pusher
                .try_send(connection, &serde_json::to_string(&snapshot).unwrap())
                .await;
            return;
        }

        // 2. Direct channel, keyed by the resolved peer id
        match self.resolve_peer(channel).await {
            Some(peer) => {
                let records = self
                    .history
                    .read(&ChannelKey::direct(requester, &peer))
                    .await;
                let snapshot = HistoryEvent::new(peer.as_str().to_string(), records);
                self.message_pusher
                    .try_send(connection, &serde_json::to_string(&snapshot).unwrap())
                    .await;
            }
            None => {
                tracing::debug!("History channel '{}' not resolvable", channel);
                let error = MessageRecord::system(
                    format!("user '{}' not found", channel),
                    utc_now_rfc3339(),
                );
                self.message_pusher
                    .try_send(
                        connection,
                        &serde_json::to_string(&MessageEvent::from(error)).unwrap(),
                    )
                    .await;
            }
        }
    }

    /// Resolve a peer: active display name first, then the id of any known
    /// identity. Identities are never deleted, so a DM log stays readable
    /// after the peer disconnects.
    async fn resolve_peer(&self, channel: &str) -> Option<IdentityId> {
        if let Some(identity) = self.registry.resolve_display_name(channel).await {
            return Some(identity);
        }
        let candidate = IdentityId::new(channel.to_string()).ok()?;
        if self.registry.name_for(&candidate).await.is_some() {
            Some(candidate)
        } else {
            None
        }
    }
}
