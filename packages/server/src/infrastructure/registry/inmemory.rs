//! In-memory house registry.
//!
//! All houses, memberships and connection handles live behind one
//! `tokio::sync::Mutex`. Mutation and fanout happen under the same lock
//! acquisition, which gives every house a single writer at a time and
//! house-local FIFO delivery. Fanout itself is non-blocking (`try_send`),
//! so the critical section never waits on a slow consumer.
//!
//! Houses with zero members are evicted on the spot. A connection's joined
//! set and each house's member list are mutated together, keeping them
//! mutual inverses.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use hearth_shared::time::unix_timestamp_millis;

use crate::{
    domain::{
        ChatMessage, ConnectionId, ConnectionIdFactory, House, HouseId, HouseIdFactory,
        HouseName, HouseRegistry, HouseSnapshot, JoinOutcome, Member, MessageContent, RelayError,
        Timestamp, UserIdentity, entity::DEFAULT_MESSAGE_CAPACITY,
    },
    infrastructure::broadcast,
};

/// Handle to one registered connection.
struct ConnectionHandle {
    identity: UserIdentity,
    sender: mpsc::Sender<String>,
    houses: HashSet<HouseId>,
}

#[derive(Default)]
struct RegistryInner {
    houses: HashMap<HouseId, House>,
    /// Name index over public houses only; private houses are reachable
    /// by id alone.
    names: HashMap<String, HouseId>,
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

/// In-memory implementation of [`HouseRegistry`].
pub struct InMemoryHouseRegistry {
    inner: Mutex<RegistryInner>,
    message_capacity: usize,
}

impl Default for InMemoryHouseRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_CAPACITY)
    }
}

impl InMemoryHouseRegistry {
    /// Create an empty registry with the given per-house message buffer cap.
    pub fn new(message_capacity: usize) -> Self {
        Self {
            inner: Mutex::new(RegistryInner::default()),
            message_capacity,
        }
    }

    /// Houses the given connection is currently a member of.
    ///
    /// Used by tests to check the membership invariant from the
    /// connection side.
    pub async fn joined_houses(&self, connection_id: ConnectionId) -> Vec<HouseId> {
        let inner = self.inner.lock().await;
        inner
            .connections
            .get(&connection_id)
            .map(|handle| handle.houses.iter().cloned().collect())
            .unwrap_or_default()
    }
}

impl RegistryInner {
    /// Deliver `frame` to the members of `house_id`, minus `exclude`.
    fn fanout_house(&self, house_id: &HouseId, frame: &str, exclude: Option<&ConnectionId>) {
        let Some(house) = self.houses.get(house_id) else {
            return;
        };
        let recipients = house.members.iter().filter_map(|member| {
            self.connections
                .get(&member.connection_id)
                .map(|handle| (&member.connection_id, &handle.sender))
        });
        broadcast::fanout(recipients, frame, exclude);
    }

    /// Remove `connection_id` from `house_id` on both sides of the
    /// membership relation, evicting the house if it ends up empty.
    /// Returns `true` if a membership was removed.
    fn detach(&mut self, connection_id: ConnectionId, house_id: &HouseId) -> bool {
        let Some(house) = self.houses.get_mut(house_id) else {
            return false;
        };
        let removed = house.remove_member(&connection_id);
        if house.is_empty() {
            let name = house.name.as_str().to_string();
            let private = house.private;
            self.houses.remove(house_id);
            if !private {
                self.names.remove(&name);
            }
            tracing::debug!("Evicted empty house '{}'", house_id);
        }
        if let Some(handle) = self.connections.get_mut(&connection_id) {
            handle.houses.remove(house_id);
        }
        removed
    }

    /// Attach `connection_id` to an existing house. Errors if either side
    /// is unknown; idempotent on re-join.
    fn attach(
        &mut self,
        connection_id: ConnectionId,
        house_id: &HouseId,
    ) -> Result<JoinOutcome, RelayError> {
        let identity = self
            .connections
            .get(&connection_id)
            .map(|handle| handle.identity.clone())
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        let house = self
            .houses
            .get_mut(house_id)
            .ok_or_else(|| RelayError::HouseNotFound(house_id.to_string()))?;

        let joined_at = Timestamp::new(unix_timestamp_millis());
        let newly_joined = house.add_member(Member::new(connection_id, identity, joined_at));
        let snapshot = house.snapshot();

        if let Some(handle) = self.connections.get_mut(&connection_id) {
            handle.houses.insert(house_id.clone());
        }

        Ok(JoinOutcome {
            house: snapshot,
            newly_joined,
        })
    }
}

#[async_trait]
impl HouseRegistry for InMemoryHouseRegistry {
    async fn register(
        &self,
        identity: UserIdentity,
        sender: mpsc::Sender<String>,
    ) -> ConnectionId {
        let connection_id = ConnectionIdFactory::generate();
        let mut inner = self.inner.lock().await;
        inner.connections.insert(
            connection_id,
            ConnectionHandle {
                identity,
                sender,
                houses: HashSet::new(),
            },
        );
        connection_id
    }

    async fn remove_connection(
        &self,
        connection_id: ConnectionId,
        user_left_frame: String,
    ) -> Vec<HouseId> {
        let mut inner = self.inner.lock().await;
        let Some(handle) = inner.connections.remove(&connection_id) else {
            return Vec::new();
        };

        let joined: Vec<HouseId> = handle.houses.into_iter().collect();
        for house_id in &joined {
            inner.detach(connection_id, house_id);
            inner.fanout_house(house_id, &user_left_frame, None);
        }
        joined
    }

    async fn join_by_name(
        &self,
        connection_id: ConnectionId,
        name: HouseName,
        user_join_frame: String,
    ) -> Result<JoinOutcome, RelayError> {
        let mut inner = self.inner.lock().await;
        if !inner.connections.contains_key(&connection_id) {
            return Err(RelayError::ConnectionNotFound(connection_id.to_string()));
        }

        let house_id = match inner.names.get(name.as_str()) {
            Some(id) => id.clone(),
            None => {
                let house = House::with_capacity(
                    HouseIdFactory::generate(),
                    name.clone(),
                    false,
                    Timestamp::new(unix_timestamp_millis()),
                    self.message_capacity,
                );
                let id = house.id.clone();
                inner.names.insert(name.into_string(), id.clone());
                inner.houses.insert(id.clone(), house);
                tracing::info!("Created public house '{}'", id);
                id
            }
        };

        let outcome = inner.attach(connection_id, &house_id)?;
        if outcome.newly_joined {
            inner.fanout_house(&house_id, &user_join_frame, Some(&connection_id));
        }
        Ok(outcome)
    }

    async fn join_private(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
    ) -> Result<JoinOutcome, RelayError> {
        let mut inner = self.inner.lock().await;
        if !inner.houses.contains_key(&house_id) {
            return Err(RelayError::HouseNotFound(house_id.to_string()));
        }
        inner.attach(connection_id, &house_id)
    }

    async fn leave(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
        user_left_frame: String,
    ) -> Result<(), RelayError> {
        let mut inner = self.inner.lock().await;
        if !inner.houses.contains_key(&house_id) {
            return Err(RelayError::HouseNotFound(house_id.to_string()));
        }
        if !inner.detach(connection_id, &house_id) {
            return Err(RelayError::NotAMember(house_id.to_string()));
        }
        inner.fanout_house(&house_id, &user_left_frame, None);
        Ok(())
    }

    async fn send_message(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
        content: MessageContent,
        timestamp: Timestamp,
        frame: String,
    ) -> Result<ChatMessage, RelayError> {
        let mut inner = self.inner.lock().await;
        let identity = inner
            .connections
            .get(&connection_id)
            .map(|handle| handle.identity.clone())
            .ok_or_else(|| RelayError::ConnectionNotFound(connection_id.to_string()))?;

        let house = inner
            .houses
            .get_mut(&house_id)
            .ok_or_else(|| RelayError::HouseNotFound(house_id.to_string()))?;
        if !house.is_member(&connection_id) {
            return Err(RelayError::NotAMember(house_id.to_string()));
        }

        let message = ChatMessage::new(identity, house_id.clone(), content, timestamp);
        house.add_message(message.clone());

        inner.fanout_house(&house_id, &frame, None);
        Ok(message)
    }

    async fn create_house(&self, name: HouseName, private: bool) -> HouseSnapshot {
        let mut inner = self.inner.lock().await;
        if !private
            && let Some(id) = inner.names.get(name.as_str())
            && let Some(existing) = inner.houses.get(id)
        {
            return existing.snapshot();
        }

        let house = House::with_capacity(
            HouseIdFactory::generate(),
            name.clone(),
            private,
            Timestamp::new(unix_timestamp_millis()),
            self.message_capacity,
        );
        let snapshot = house.snapshot();
        if !private {
            inner.names.insert(name.into_string(), house.id.clone());
        }
        tracing::info!(
            "Created house '{}' ({})",
            house.id,
            if private { "private" } else { "public" }
        );
        inner.houses.insert(house.id.clone(), house);
        snapshot
    }

    async fn list_houses(&self) -> Vec<HouseSnapshot> {
        let inner = self.inner.lock().await;
        let mut snapshots: Vec<HouseSnapshot> =
            inner.houses.values().map(House::snapshot).collect();
        snapshots.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        snapshots
    }

    async fn count_connections(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.connections.len()
    }
}
