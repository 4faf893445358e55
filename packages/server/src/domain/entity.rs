//! Core domain models for the chat relay.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::value_object::{
    ConnectionId, DisplayName, HouseId, HouseName, MessageContent, Timestamp, UserId,
};

/// Default maximum number of buffered messages per house
pub const DEFAULT_MESSAGE_CAPACITY: usize = 100;

/// Resolved identity of a connected user.
///
/// Derived once at connect time and immutable for the connection's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Stable user identifier
    pub id: UserId,
    /// Human-readable display name
    pub name: DisplayName,
}

impl UserIdentity {
    /// Create a new identity.
    pub fn new(id: UserId, name: DisplayName) -> Self {
        Self { id, name }
    }
}

/// A house member: one connection plus the identity behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// The member's connection
    pub connection_id: ConnectionId,
    /// Identity behind the connection
    pub identity: UserIdentity,
    /// Timestamp when the member joined
    pub joined_at: Timestamp,
}

impl Member {
    /// Create a new member.
    pub fn new(connection_id: ConnectionId, identity: UserIdentity, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            identity,
            joined_at,
        }
    }
}

/// A chat message, immutable once created.
///
/// Lives only as long as its containing house's buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identity of the sender
    pub sender: UserIdentity,
    /// House the message was sent to
    pub house_id: HouseId,
    /// Message text
    pub content: MessageContent,
    /// Timestamp when the message was accepted by the relay
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a new chat message.
    pub fn new(
        sender: UserIdentity,
        house_id: HouseId,
        content: MessageContent,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender,
            house_id,
            content,
            timestamp,
        }
    }
}

/// A house: a named channel grouping connections for message fanout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct House {
    /// House identifier
    pub id: HouseId,
    /// House name (unique among public houses)
    pub name: HouseName,
    /// Private houses are joined by id, never by name lookup
    pub private: bool,
    /// Current members
    pub members: Vec<Member>,
    /// In-memory message buffer, oldest first
    pub messages: VecDeque<ChatMessage>,
    /// Timestamp when the house was created
    pub created_at: Timestamp,
    /// Buffer cap; the oldest message is dropped on overflow
    pub message_capacity: usize,
}

impl House {
    /// Create a new empty house with the default message capacity.
    pub fn new(id: HouseId, name: HouseName, private: bool, created_at: Timestamp) -> Self {
        Self::with_capacity(id, name, private, created_at, DEFAULT_MESSAGE_CAPACITY)
    }

    /// Create a new empty house with a custom message capacity.
    pub fn with_capacity(
        id: HouseId,
        name: HouseName,
        private: bool,
        created_at: Timestamp,
        message_capacity: usize,
    ) -> Self {
        Self {
            id,
            name,
            private,
            members: Vec::new(),
            messages: VecDeque::new(),
            created_at,
            message_capacity,
        }
    }

    /// Whether the given connection is currently a member.
    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members
            .iter()
            .any(|m| &m.connection_id == connection_id)
    }

    /// Add a member.
    ///
    /// Idempotent: returns `false` (and leaves the member list untouched)
    /// if the connection is already a member.
    pub fn add_member(&mut self, member: Member) -> bool {
        if self.is_member(&member.connection_id) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// Remove a member by connection id. Returns `true` if one was removed.
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| &m.connection_id != connection_id);
        self.members.len() < before
    }

    /// Append a message to the buffer, dropping the oldest entry at capacity.
    pub fn add_message(&mut self, message: ChatMessage) {
        if self.messages.len() >= self.message_capacity {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    /// Whether the house has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Take an owned snapshot for the `house-joined` event and the HTTP
    /// surface. Members are reduced to their identities.
    pub fn snapshot(&self) -> HouseSnapshot {
        HouseSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            private: self.private,
            members: self.members.iter().map(|m| m.identity.clone()).collect(),
            messages: self.messages.iter().cloned().collect(),
            created_at: self.created_at,
        }
    }
}

/// Point-in-time copy of a house without connection internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseSnapshot {
    pub id: HouseId,
    pub name: HouseName,
    pub private: bool,
    pub members: Vec<UserIdentity>,
    pub messages: Vec<ChatMessage>,
    pub created_at: Timestamp,
}
