//! UseCase: message routing.
//!
//! Public messages go to every live connection and into the `all` log.
//! Direct messages go to every connection of the recipient identity plus
//! the sending connection, and into the canonical DM log of the pair.
//! An unresolvable recipient is reported to the sender only.

use std::sync::Arc;

use idobata_shared::time::utc_now_rfc3339;

use crate::domain::{
    ChannelKey, ConnectionId, HistoryStore, IdentityId, IdentityRegistry, MessagePusher,
    MessageRecord, PUBLIC_CHANNEL,
};
use crate::infrastructure::dto::websocket::MessageEvent;

use super::error::SendMessageError;

/// Message-event use case
pub struct SendMessageUseCase {
    registry: Arc<dyn IdentityRegistry>,
    history: Arc<dyn HistoryStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl SendMessageUseCase {
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

    /// Route one message event.
    ///
    /// # Arguments
    ///
    /// * `connection` - The sending connection (receives the echo on DMs)
    /// * `sender` - Identity bound to that connection
    /// * `text` - Message body
    /// * `to` - `"all"` (case-insensitive) or a display name / identity id
    ///
    /// # Returns
    ///
    /// * `Err(SendMessageError::NotJoined)` - the sender has no display name
    ///   yet; the caller drops the event
    pub async fn execute(
        &self,
        connection: &ConnectionId,
        sender: &IdentityId,
        text: String,
        to: String,
    ) -> Result<(), SendMessageError> {
        // 1. The state machine requires a completed join
        let sender_name = match self.registry.name_for(sender).await {
            Some(name) if !name.is_empty() => name,
            _ => return Err(SendMessageError::NotJoined),
        };

        // 2. Public path
        if to.eq_ignore_ascii_case(PUBLIC_CHANNEL) {
            let record = MessageRecord::public_chat(
                sender_name,
                sender.clone(),
                text,
                utc_now_rfc3339(),
            );
            self.history
                .append(&ChannelKey::public(), record.clone())
                .await;
            let json = serde_json::to_string(&MessageEvent::from(record)).unwrap();
            self.message_pusher.broadcast_all(&json).await;
            return Ok(());
        }

        // 3. Direct path
        match self.resolve_recipient(&to).await {
            Some(recipient) => {
                let recipient_name = self
                    .registry
                    .name_for(&recipient)
                    .await
                    .unwrap_or_default();
                let record = MessageRecord::direct_chat(
                    sender_name,
                    sender.clone(),
                    text,
                    recipient.clone(),
                    recipient_name,
                    utc_now_rfc3339(),
                );
                self.history
                    .append(&ChannelKey::direct(sender, &recipient), record.clone())
                    .await;

                // every connection of the recipient, plus the sending one
                let mut targets = self.registry.connections_for(&recipient).await;
                if !targets.contains(connection) {
                    targets.push(connection.clone());
                }
                let json = serde_json::to_string(&MessageEvent::from(record)).unwrap();
                self.message_pusher.send_to_connections(&targets, &json).await;
            }
            None => {
                tracing::debug!("Recipient '{}' not found, notifying sender", to);
                let error = MessageRecord::system(
                    format!("user '{}' not found", to),
                    utc_now_rfc3339(),
                );
                let json = serde_json::to_string(&MessageEvent::from(error)).unwrap();
                self.message_pusher.try_send(connection, &json).await;
            }
        }
        Ok(())
    }

    /// Resolve a recipient: active display name first, then a raw identity
    /// id that names an active identity
    async fn resolve_recipient(&self, to: &str) -> Option<IdentityId> {
        if let Some(identity) = self.registry.resolve_display_name(to).await {
            return Some(identity);
        }
        let candidate = IdentityId::new(to.to_string()).ok()?;
        if self.registry.is_active(&candidate).await {
            Some(candidate)
        } else {
            None
        }
    }
}
