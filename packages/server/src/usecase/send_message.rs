//! UseCase: send a chat message to a house.

use std::sync::Arc;

use hearth_shared::time::unix_timestamp_millis;

use crate::{
    domain::{ConnectionId, HouseId, HouseRegistry, MessageContent, Timestamp, UserIdentity},
    infrastructure::dto::websocket::{HouseRefDto, IdentityDto, ServerEvent},
};

use super::error::ActionError;

/// Send: validates membership, appends to the house buffer and echoes the
/// message to every member including the sender.
pub struct SendMessageUseCase {
    registry: Arc<dyn HouseRegistry>,
}

impl SendMessageUseCase {
    pub fn new(registry: Arc<dyn HouseRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the send. The house reference is echoed back as the client
    /// supplied it.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: &UserIdentity,
        house_ref: HouseRefDto,
        text: String,
    ) -> Result<(), ActionError> {
        let house_id = HouseId::new(house_ref.id.clone())?;
        let content = MessageContent::new(text)?;
        let timestamp = Timestamp::new(unix_timestamp_millis());

        let echo = ServerEvent::SendMessage {
            sender: IdentityDto::from(identity),
            house: house_ref,
            message: content.as_str().to_string(),
            timestamp: timestamp.value(),
        };
        self.registry
            .send_message(connection_id, house_id, content, timestamp, echo.to_frame())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            DisplayName, HouseIdFactory, HouseName, IdentityFactory, RelayError,
            registry::MockHouseRegistry,
        },
        infrastructure::InMemoryHouseRegistry,
    };
    use tokio::sync::mpsc;

    fn test_identity(name: &str) -> UserIdentity {
        IdentityFactory::ephemeral(DisplayName::new(name.to_string()).unwrap())
    }

    fn house_ref(id: &crate::domain::HouseId) -> HouseRefDto {
        HouseRefDto {
            id: id.as_str().to_string(),
            name: Some("lobby".to_string()),
        }
    }

    #[tokio::test]
    async fn test_send_message_echoes_to_sender_and_members() {
        // given: alice and bob in "lobby"
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let alice = test_identity("alice");
        let bob = test_identity("bob");
        let (alice_tx, mut alice_rx) = mpsc::channel(8);
        let (bob_tx, mut bob_rx) = mpsc::channel(8);
        let alice_conn = registry.register(alice.clone(), alice_tx).await;
        let bob_conn = registry.register(bob.clone(), bob_tx).await;
        let house_id = registry
            .join_by_name(
                alice_conn,
                HouseName::new("lobby".to_string()).unwrap(),
                String::new(),
            )
            .await
            .unwrap()
            .house
            .id;
        registry
            .join_by_name(
                bob_conn,
                HouseName::new("lobby".to_string()).unwrap(),
                String::new(),
            )
            .await
            .unwrap();
        while alice_rx.try_recv().is_ok() {}

        // when: bob sends "hi"
        let usecase = SendMessageUseCase::new(registry.clone());
        usecase
            .execute(bob_conn, &bob, house_ref(&house_id), "hi".to_string())
            .await
            .unwrap();

        // then: both alice and bob receive the send-message event
        for rx in [&mut alice_rx, &mut bob_rx] {
            let frame = rx.try_recv().unwrap();
            let event: ServerEvent = serde_json::from_str(&frame).unwrap();
            let ServerEvent::SendMessage {
                sender, message, ..
            } = event
            else {
                panic!("expected send-message, got {event:?}");
            };
            assert_eq!(sender.name, "bob");
            assert_eq!(message, "hi");
        }
    }

    #[tokio::test]
    async fn test_send_message_without_membership_fails() {
        // given: a registry that rejects the sender
        let house_id = HouseIdFactory::generate();
        let mut registry = MockHouseRegistry::new();
        let rejected_id = house_id.clone();
        registry
            .expect_send_message()
            .returning(move |_, _, _, _, _| {
                Err(RelayError::NotAMember(rejected_id.to_string()))
            });
        let usecase = SendMessageUseCase::new(Arc::new(registry));
        let identity = test_identity("alice");

        // when:
        let result = usecase
            .execute(
                crate::domain::ConnectionIdFactory::generate(),
                &identity,
                house_ref(&house_id),
                "hi".to_string(),
            )
            .await;

        // then: NotAMember surfaces as an error event for the sender
        let error = result.unwrap_err();
        assert_eq!(
            error,
            ActionError::Relay(RelayError::NotAMember(house_id.to_string()))
        );
        assert!(error.to_event().is_some());
    }

    #[tokio::test]
    async fn test_send_message_rejects_empty_text() {
        // given:
        let registry = Arc::new(InMemoryHouseRegistry::default());
        let usecase = SendMessageUseCase::new(registry.clone());
        let identity = test_identity("alice");
        let house_id = HouseIdFactory::generate();

        // when:
        let result = usecase
            .execute(
                crate::domain::ConnectionIdFactory::generate(),
                &identity,
                house_ref(&house_id),
                String::new(),
            )
            .await;

        // then: dropped without a user-visible error event
        let error = result.unwrap_err();
        assert!(matches!(error, ActionError::InvalidField(_)));
        assert!(error.to_event().is_none());
    }
}
