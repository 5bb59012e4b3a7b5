//! UseCase: participant connection handling.

use std::net::IpAddr;
use std::sync::Arc;

use crate::domain::{ConnectionId, Identity, IdentityRegistry, MessagePusher, PusherChannel};

/// Binds an accepted connection to its (possibly pre-existing) identity.
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn IdentityRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    pub fn new(registry: Arc<dyn IdentityRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Execute the connection binding.
    ///
    /// # Arguments
    ///
    /// * `connection` - Freshly minted id for the accepted transport session
    /// * `source_ip` - Peer address, the key of the sticky identity binding
    /// * `sender` - Outbound channel for this connection
    ///
    /// # Returns
    ///
    /// The identity bound to the connection; reconnecting clients get their
    /// previous identity back, including display name and avatar.
    pub async fn execute(
        &self,
        connection: ConnectionId,
        source_ip: IpAddr,
        sender: PusherChannel,
    ) -> Identity {
        // 1. Register the outbound channel first so a concurrent broadcast
        //    can already reach the new connection
        self.message_pusher
            .register(connection.clone(), sender)
            .await;

        // 2. Bind the connection, reusing the address's identity if bound
        self.registry.connect(connection, source_ip).await
    }
}
