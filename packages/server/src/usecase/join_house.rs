//! UseCase: join (or create) a public house by name.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, HouseName, HouseRegistry, UserIdentity},
    infrastructure::dto::websocket::{HouseDto, IdentityDto, ServerEvent},
};

use super::error::ActionError;

/// Join-by-name: upserts the house, attaches the connection, and notifies
/// the existing members.
pub struct JoinHouseUseCase {
    registry: Arc<dyn HouseRegistry>,
}

impl JoinHouseUseCase {
    pub fn new(registry: Arc<dyn HouseRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the join.
    ///
    /// On a new membership the other members receive `user-join` (the
    /// joiner is excluded; it gets the returned `house-joined` instead).
    /// A re-join of a house the connection already belongs to changes
    /// nothing but still returns `house-joined` so the client can re-sync.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: &UserIdentity,
        raw_name: String,
    ) -> Result<ServerEvent, ActionError> {
        let name = HouseName::new(raw_name)?;

        let user_join = ServerEvent::UserJoin {
            sender: IdentityDto::from(identity),
        };
        let outcome = self
            .registry
            .join_by_name(connection_id, name, user_join.to_frame())
            .await?;

        tracing::info!(
            "'{}' joined house '{}' (newly_joined: {})",
            identity.name,
            outcome.house.id,
            outcome.newly_joined
        );

        Ok(ServerEvent::HouseJoined {
            house: HouseDto::from(&outcome.house),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, IdentityFactory},
        infrastructure::InMemoryHouseRegistry,
    };
    use tokio::sync::mpsc;

    fn test_identity(name: &str) -> UserIdentity {
        IdentityFactory::ephemeral(DisplayName::new(name.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_join_house_returns_snapshot_event() {
        // given:
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let usecase = JoinHouseUseCase::new(registry.clone());
        let identity = test_identity("alice");
        let (tx, _rx) = mpsc::channel(8);
        let connection_id = registry.register(identity.clone(), tx).await;

        // when:
        let event = usecase
            .execute(connection_id, &identity, "lobby".to_string())
            .await
            .unwrap();

        // then: house-joined with an empty message buffer
        let ServerEvent::HouseJoined { house } = event else {
            panic!("expected house-joined, got {event:?}");
        };
        assert_eq!(house.name, "lobby");
        assert!(house.messages.is_empty());
        assert!(!house.private);
    }

    #[tokio::test]
    async fn test_join_house_notifies_existing_members() {
        // given: alice already in "lobby"
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let usecase = JoinHouseUseCase::new(registry.clone());
        let alice = test_identity("alice");
        let (alice_tx, mut alice_rx) = mpsc::channel(8);
        let alice_conn = registry.register(alice.clone(), alice_tx).await;
        usecase
            .execute(alice_conn, &alice, "lobby".to_string())
            .await
            .unwrap();

        // when: bob joins
        let bob = test_identity("bob");
        let (bob_tx, mut bob_rx) = mpsc::channel(8);
        let bob_conn = registry.register(bob.clone(), bob_tx).await;
        usecase
            .execute(bob_conn, &bob, "lobby".to_string())
            .await
            .unwrap();

        // then: alice receives user-join for bob, bob receives nothing
        let frame = alice_rx.try_recv().unwrap();
        let event: ServerEvent = serde_json::from_str(&frame).unwrap();
        let ServerEvent::UserJoin { sender } = event else {
            panic!("expected user-join, got {event:?}");
        };
        assert_eq!(sender.name, "bob");
        assert!(bob_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_house_rejects_empty_name() {
        // given:
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let usecase = JoinHouseUseCase::new(registry.clone());
        let identity = test_identity("alice");
        let (tx, _rx) = mpsc::channel(8);
        let connection_id = registry.register(identity.clone(), tx).await;

        // when:
        let result = usecase
            .execute(connection_id, &identity, String::new())
            .await;

        // then:
        assert!(matches!(result, Err(ActionError::InvalidField(_))));
    }
}
