//! Outbound delivery seam.
//!
//! The WebSocket itself lives in the UI layer; the core only ever sees a
//! per-connection sender channel registered here. Delivery is best-effort
//! by contract: a failed send is logged and swallowed, never surfaced to
//! the caller, and never removes the connection (removal happens only via
//! the disconnect path).

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::ConnectionId;

/// Per-connection outbound channel
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Message delivery interface used by the use case layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Register a connection's outbound channel
    async fn register(&self, connection: ConnectionId, sender: PusherChannel);

    /// Remove a connection's outbound channel
    async fn unregister(&self, connection: &ConnectionId);

    /// Best-effort send to one connection; failures are logged, not returned
    async fn try_send(&self, connection: &ConnectionId, content: &str);

    /// Best-effort send to a set of connections; one failing target never
    /// prevents delivery to the rest
    async fn send_to_connections(&self, targets: &[ConnectionId], content: &str);

    /// Best-effort send to every live connection
    async fn broadcast_all(&self, content: &str);
}
