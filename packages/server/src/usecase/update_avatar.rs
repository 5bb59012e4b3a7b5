//! UseCase: avatar attachment.
//!
//! The HTTP surface stores/deletes the actual file; this use case owns the
//! registry mutation and the roster broadcast that follows it.

use std::net::IpAddr;
use std::sync::Arc;

use crate::domain::{IdentityId, IdentityRegistry, MessagePusher};
use crate::infrastructure::dto::websocket::UserListEvent;

use super::error::UpdateAvatarError;

/// Avatar set/clear use case
pub struct UpdateAvatarUseCase {
    registry: Arc<dyn IdentityRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl UpdateAvatarUseCase {
    pub fn new(registry: Arc<dyn IdentityRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// Identity bound to a caller address, if any.
    ///
    /// The upload surface is keyed by source address; callers without a
    /// binding are rejected before any file is written.
    pub async fn identity_for_address(
        &self,
        source_ip: IpAddr,
    ) -> Result<IdentityId, UpdateAvatarError> {
        self.registry
            .identity_for_address(source_ip)
            .await
            .ok_or(UpdateAvatarError::UnknownAddress)
    }

    /// Set or clear the avatar reference and broadcast the updated roster
    pub async fn execute(&self, identity: &IdentityId, avatar: Option<String>) {
        // 1. Mutate the registry
        self.registry.set_avatar(identity, avatar).await;

        // 2. Broadcast the updated roster
        let roster = UserListEvent::new(self.registry.list_active().await);
        self.message_pusher
            .broadcast_all(&serde_json::to_string(&roster).unwrap())
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;
    use crate::domain::pusher::MockMessagePusher;
    use crate::infrastructure::repository::InMemoryIdentityRegistry;
    use crate::usecase::test_support::{create_test_stores, ip};

    #[tokio::test]
    async fn test_unknown_address_is_rejected() {
        // given:
        let (registry, _history, pusher) = create_test_stores();
        let usecase = UpdateAvatarUseCase::new(registry, pusher);

        // when:
        let result = usecase.identity_for_address(ip(9)).await;

        // then:
        assert_eq!(result, Err(UpdateAvatarError::UnknownAddress));
    }

    #[tokio::test]
    async fn test_set_avatar_updates_roster() {
        // given:
        let (registry, _history, pusher) = create_test_stores();
        let usecase = UpdateAvatarUseCase::new(registry.clone(), pusher.clone());
        let identity = registry.connect(ConnectionId::generate(), ip(1)).await;
        registry.set_display_name(&identity.id, "Sam").await;

        // when:
        let resolved = usecase.identity_for_address(ip(1)).await.unwrap();
        usecase
            .execute(&resolved, Some("/avatars/sam.png".to_string()))
            .await;

        // then:
        assert_eq!(resolved, identity.id);
        let broadcasts = pusher.broadcasts().await;
        assert_eq!(broadcasts.len(), 1);
        assert!(broadcasts[0].contains(r#""avatar":"/avatars/sam.png""#));
    }

    #[tokio::test]
    async fn test_clear_avatar_broadcasts_null_reference() {
        // given:
        let registry = Arc::new(InMemoryIdentityRegistry::new());
        let identity = registry.connect(ConnectionId::generate(), ip(1)).await;
        registry.set_display_name(&identity.id, "Sam").await;
        registry
            .set_avatar(&identity.id, Some("/avatars/sam.png".to_string()))
            .await;
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast_all()
            .times(1)
            .withf(|content| content.contains(r#""avatar":null"#))
            .returning(|_| ());
        let usecase = UpdateAvatarUseCase::new(registry.clone(), Arc::new(pusher));

        // when:
        usecase.execute(&identity.id, None).await;

        // then: the mock verified the broadcast on drop
        let active = registry.list_active().await;
        assert_eq!(active[0].avatar, None);
    }
}
