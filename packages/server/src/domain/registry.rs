//! House registry abstraction.
//!
//! The usecase layer depends on this trait; the in-memory implementation
//! lives in the infrastructure layer (dependency inversion).
//!
//! Pre-serialized wire frames are handed in by the caller so the
//! implementation can fan them out while it still holds the house state
//! lock. That is what guarantees house-local FIFO delivery: mutation and
//! fanout happen under one lock acquisition.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{
    entity::{ChatMessage, HouseSnapshot, UserIdentity},
    error::RelayError,
    value_object::{ConnectionId, HouseId, HouseName, MessageContent, Timestamp},
};

/// Outcome of a join operation.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    /// Snapshot taken right after the join, sent back as `house-joined`
    pub house: HouseSnapshot,
    /// `false` when the connection was already a member (re-sync join)
    pub newly_joined: bool,
}

/// Registry of live houses and connections.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HouseRegistry: Send + Sync {
    /// Register a connection with its resolved identity and outbound
    /// channel. Returns the id under which the connection is tracked.
    async fn register(
        &self,
        identity: UserIdentity,
        sender: mpsc::Sender<String>,
    ) -> ConnectionId;

    /// Remove a connection entirely: leave every joined house, delivering
    /// `user_left_frame` to each house's remaining members exactly once,
    /// and evict houses left empty. Returns the ids of the houses left.
    ///
    /// Unknown connections are a no-op (disconnect may race a failed
    /// registration).
    async fn remove_connection(
        &self,
        connection_id: ConnectionId,
        user_left_frame: String,
    ) -> Vec<HouseId>;

    /// Join a public house by name, creating it if absent.
    ///
    /// On a new membership `user_join_frame` is delivered to the other
    /// members; a re-join delivers nothing and still returns the snapshot
    /// so the caller can re-emit `house-joined`.
    async fn join_by_name(
        &self,
        connection_id: ConnectionId,
        name: HouseName,
        user_join_frame: String,
    ) -> Result<JoinOutcome, RelayError>;

    /// Join an existing house by id. Never creates; private houses are
    /// only reachable this way. No `user-join` fanout for private houses.
    async fn join_private(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
    ) -> Result<JoinOutcome, RelayError>;

    /// Leave a house, delivering `user_left_frame` to the remaining
    /// members. Evicts the house if it ends up empty.
    async fn leave(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
        user_left_frame: String,
    ) -> Result<(), RelayError>;

    /// Append a message to a house the connection is a member of and
    /// deliver `frame` to every member including the sender (echo).
    async fn send_message(
        &self,
        connection_id: ConnectionId,
        house_id: HouseId,
        content: MessageContent,
        timestamp: Timestamp,
        frame: String,
    ) -> Result<ChatMessage, RelayError>;

    /// Create a house explicitly (the only way a private house comes to
    /// exist). Public names are upserted: an existing public house with
    /// the same name is returned as-is.
    async fn create_house(&self, name: HouseName, private: bool) -> HouseSnapshot;

    /// Snapshots of all live houses.
    async fn list_houses(&self) -> Vec<HouseSnapshot>;

    /// Number of registered connections.
    async fn count_connections(&self) -> usize;
}
