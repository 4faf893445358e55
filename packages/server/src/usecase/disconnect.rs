//! UseCase: connection teardown.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, HouseId, HouseRegistry, UserIdentity},
    infrastructure::dto::websocket::{IdentityDto, ServerEvent},
};

/// Disconnect: leaves every joined house, broadcasting `user-left` to each
/// house's remaining members exactly once.
pub struct DisconnectUseCase {
    registry: Arc<dyn HouseRegistry>,
}

impl DisconnectUseCase {
    pub fn new(registry: Arc<dyn HouseRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the teardown. Returns the houses the connection was removed
    /// from. Never fails: tearing down an unknown connection is a no-op.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: &UserIdentity,
    ) -> Vec<HouseId> {
        let user_left = ServerEvent::UserLeft {
            sender: IdentityDto::from(identity),
        };
        let left = self
            .registry
            .remove_connection(connection_id, user_left.to_frame())
            .await;

        tracing::info!(
            "'{}' disconnected, left {} house(s)",
            identity.name,
            left.len()
        );
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{DisplayName, HouseName, IdentityFactory},
        infrastructure::InMemoryHouseRegistry,
    };
    use tokio::sync::mpsc;

    fn test_identity(name: &str) -> UserIdentity {
        IdentityFactory::ephemeral(DisplayName::new(name.to_string()).unwrap())
    }

    #[tokio::test]
    async fn test_disconnect_notifies_each_shared_house_once() {
        // given: alice and bob share "lobby" and "den"
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let alice = test_identity("alice");
        let bob = test_identity("bob");
        let (alice_tx, mut alice_rx) = mpsc::channel(8);
        let (bob_tx, _bob_rx) = mpsc::channel(8);
        let alice_conn = registry.register(alice.clone(), alice_tx).await;
        let bob_conn = registry.register(bob.clone(), bob_tx).await;
        for name in ["lobby", "den"] {
            registry
                .join_by_name(
                    alice_conn,
                    HouseName::new(name.to_string()).unwrap(),
                    String::new(),
                )
                .await
                .unwrap();
            registry
                .join_by_name(
                    bob_conn,
                    HouseName::new(name.to_string()).unwrap(),
                    String::new(),
                )
                .await
                .unwrap();
        }
        while alice_rx.try_recv().is_ok() {}

        // when: bob disconnects
        let usecase = DisconnectUseCase::new(registry.clone());
        let left = usecase.execute(bob_conn, &bob).await;

        // then: alice hears user-left exactly twice (once per house)
        assert_eq!(left.len(), 2);
        let mut user_left_count = 0;
        while let Ok(frame) = alice_rx.try_recv() {
            let event: ServerEvent = serde_json::from_str(&frame).unwrap();
            let ServerEvent::UserLeft { sender } = event else {
                panic!("expected user-left, got {event:?}");
            };
            assert_eq!(sender.name, "bob");
            user_left_count += 1;
        }
        assert_eq!(user_left_count, 2);
    }

    #[tokio::test]
    async fn test_disconnect_unknown_connection_is_noop() {
        // given:
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let usecase = DisconnectUseCase::new(registry);

        // when:
        let left = usecase
            .execute(
                crate::domain::ConnectionIdFactory::generate(),
                &test_identity("ghost"),
            )
            .await;

        // then:
        assert!(left.is_empty());
    }
}
