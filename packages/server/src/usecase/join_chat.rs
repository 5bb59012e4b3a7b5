//! UseCase: join handling.
//!
//! A join assigns (or re-assigns) the display name, announces the
//! participant to everyone and replays the public history to the requester.

use std::sync::Arc;

use idobata_shared::time::utc_now_rfc3339;

use crate::domain::{
    ChannelKey, ConnectionId, HistoryStore, IdentityId, IdentityRegistry, MessagePusher,
    MessageRecord, PUBLIC_CHANNEL,
};
use crate::infrastructure::dto::websocket::{
    EventType, HistoryEvent, JoinedEvent, MessageEvent, UserListEvent,
};

/// Join-event use case
pub struct JoinChatUseCase {
    registry: Arc<dyn IdentityRegistry>,
    history: Arc<dyn HistoryStore>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinChatUseCase {
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

    /// Execute a join.
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
        // 1. Assign the display name
        let final_name = self.registry.set_display_name(identity, desired_name).await;

        // 2. Persist and broadcast the join notice
        let notice = MessageRecord::system(format!("{} joined", final_name), utc_now_rfc3339());
        self.history
            .append(&ChannelKey::public(), notice.clone())
            .await;
        let notice_json = serde_json::to_string(&MessageEvent::from(notice)).unwrap();
        self.message_pusher.broadcast_all(&notice_json).await;

        // 3. Broadcast the updated roster
        let roster = UserListEvent::new(self.registry.list_active().await);
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&roster).unwrap())
            .await;

        // 4. Acknowledge the (possibly adjusted) name to the requester
        let joined = JoinedEvent {
            r#type: EventType::Joined,
            user: final_name.clone(),
            id: identity.as_str().to_string(),
            ts: utc_now_rfc3339(),
        };
        self.message_pusher
            .try_send(connection, &serde_json::to_string(&joined).unwrap())
            .await;

        // 5. Replay the public history to the requester
        let snapshot = HistoryEvent::new(
            PUBLIC_CHANNEL.to_string(),
            self.history.read(&ChannelKey::public()).await,
        );
        self.message_pusher
            .try_send(connection, &serde_json::to_string(&snapshot).unwrap())
            .await;

        final_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{create_test_stores, ip};

    #[tokio::test]
    async fn test_join_broadcasts_notice_roster_and_acks_requester() {
        // given:
        let (registry, history, pusher) = create_test_stores();
        let usecase = JoinChatUseCase::new(registry.clone(), history.clone(), pusher.clone());
        let connection = ConnectionId::generate();
        let identity = registry.connect(connection.clone(), ip(1)).await;

        // when:
        let final_name = usecase.execute(&connection, &identity.id, "Sam").await;

        // then:
        assert_eq!(final_name, "Sam");

        // the join notice and the roster went to everyone
        let broadcasts = pusher.broadcasts().await;
        assert_eq!(broadcasts.len(), 2);
        assert!(broadcasts[0].contains(r#""user":"_system""#));
        assert!(broadcasts[0].contains("Sam joined"));
        assert!(broadcasts[1].contains(r#""type":"user_list""#));
        assert!(broadcasts[1].contains(&format!(r#""id":"{}""#, identity.id)));

        // the requester got the joined ack and the public history
        let unicasts = pusher.unicasts_to(&connection).await;
        assert_eq!(unicasts.len(), 2);
        assert!(unicasts[0].contains(r#""type":"joined""#));
        assert!(unicasts[0].contains(r#""user":"Sam""#));
        assert!(unicasts[1].contains(r#""type":"history""#));
        assert!(unicasts[1].contains(r#""channel":"all""#));
        // the freshly stored join notice is part of the replayed history
        assert!(unicasts[1].contains("Sam joined"));
    }

    #[tokio::test]
    async fn test_join_persists_the_notice() {
        // given:
        let (registry, history, pusher) = create_test_stores();
        let usecase = JoinChatUseCase::new(registry.clone(), history.clone(), pusher);
        let connection = ConnectionId::generate();
        let identity = registry.connect(connection.clone(), ip(1)).await;

        // when:
        usecase.execute(&connection, &identity.id, "Sam").await;

        // then:
        let log = history.read(&ChannelKey::public()).await;
        assert_eq!(log.len(), 1);
        assert!(log[0].is_system());
        assert_eq!(log[0].text, "Sam joined");
    }

    #[tokio::test]
    async fn test_second_join_with_same_name_gets_suffix() {
        // given:
        let (registry, history, pusher) = create_test_stores();
        let usecase = JoinChatUseCase::new(registry.clone(), history, pusher.clone());
        let conn_x = ConnectionId::generate();
        let conn_y = ConnectionId::generate();
        let x = registry.connect(conn_x.clone(), ip(1)).await;
        let y = registry.connect(conn_y.clone(), ip(2)).await;

        // when:
        let name_x = usecase.execute(&conn_x, &x.id, "Sam").await;
        let name_y = usecase.execute(&conn_y, &y.id, "Sam").await;

        // then:
        assert_eq!(name_x, "Sam");
        assert_eq!(name_y, "Sam#2");
        // both appear in the latest roster broadcast
        let broadcasts = pusher.broadcasts().await;
        let roster = broadcasts.last().unwrap();
        assert!(roster.contains(r#""user":"Sam""#));
        assert!(roster.contains(r#""user":"Sam#2""#));
    }
}
