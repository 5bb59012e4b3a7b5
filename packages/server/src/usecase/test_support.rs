//! Shared helpers for UseCase tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};
use crate::infrastructure::repository::{InMemoryHistoryStore, InMemoryIdentityRegistry};

/// One observed delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Unicast(ConnectionId, String),
    Multicast(Vec<ConnectionId>, String),
    Broadcast(String),
}

/// MessagePusher double that records every delivery instead of sending
pub struct RecordingPusher {
    deliveries: Mutex<Vec<Delivery>>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self {
            deliveries: Mutex::new(Vec::new()),
        }
    }

    /// All deliveries observed so far, in order
    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.lock().await.clone()
    }

    /// Payloads of broadcast deliveries only
    pub async fn broadcasts(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter_map(|d| match d {
                Delivery::Broadcast(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payloads unicast to one specific connection, in order
    pub async fn unicasts_to(&self, connection: &ConnectionId) -> Vec<String> {
        self.deliveries
            .lock()
            .await
            .iter()
            .filter_map(|d| match d {
                Delivery::Unicast(target, payload) if target == connection => {
                    Some(payload.clone())
                }
                _ => None,
            })
            .collect()
    }

}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register(&self, _connection: ConnectionId, _sender: PusherChannel) {}

    async fn unregister(&self, _connection: &ConnectionId) {}

    async fn try_send(&self, connection: &ConnectionId, content: &str) {
        self.deliveries
            .lock()
            .await
            .push(Delivery::Unicast(connection.clone(), content.to_string()));
    }

    async fn send_to_connections(&self, targets: &[ConnectionId], content: &str) {
        self.deliveries
            .lock()
            .await
            .push(Delivery::Multicast(targets.to_vec(), content.to_string()));
    }

    async fn broadcast_all(&self, content: &str) {
        self.deliveries
            .lock()
            .await
            .push(Delivery::Broadcast(content.to_string()));
    }
}

/// Fresh registry + history + recording pusher triple
pub fn create_test_stores() -> (
    Arc<InMemoryIdentityRegistry>,
    Arc<InMemoryHistoryStore>,
    Arc<RecordingPusher>,
) {
    (
        Arc::new(InMemoryIdentityRegistry::new()),
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(RecordingPusher::new()),
    )
}

/// Loopback address helper for registry connects
pub fn ip(last: u8) -> std::net::IpAddr {
    std::net::IpAddr::from([127, 0, 0, last])
}
