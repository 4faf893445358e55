//! Wire envelopes: one JSON object per websocket text frame.
//!
//! Both directions are closed tagged unions keyed by the `action` field,
//! validated at the boundary. The field shapes match the reference client
//! fanout code: inbound payloads ride in `message`, chat messages carry a
//! `house` reference object.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, HouseSnapshot, UserIdentity};

/// Inbound action envelope (client → server).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ClientAction {
    /// Join (or create) a public house by name.
    JoinHouse { message: String },
    /// Join an existing private house by id.
    JoinHousePrivate { message: String },
    /// Leave a house by id.
    LeaveHouse { message: String },
    /// Send a chat message to a house.
    SendMessage { message: String, house: HouseRefDto },
}

/// Outbound event envelope (server → client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Confirms a join; carries the house snapshot including the message
    /// buffer (an empty array for a fresh house).
    HouseJoined { house: HouseDto },
    /// Someone joined a house you are in.
    UserJoin { sender: IdentityDto },
    /// Someone left a house you are in, or disconnected.
    UserLeft { sender: IdentityDto },
    /// A chat message, echoed to every member including the sender.
    SendMessage {
        sender: IdentityDto,
        house: HouseRefDto,
        message: String,
        timestamp: i64,
    },
    /// Action-level failure surfaced to the sender only.
    Error { code: ErrorCode, message: String },
}

impl ServerEvent {
    /// Serialize into a wire frame.
    pub fn to_frame(&self) -> String {
        // A closed union of plain strings and numbers cannot fail to
        // serialize.
        serde_json::to_string(self).expect("ServerEvent serialization")
    }
}

/// Error codes carried by the `error` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    RoomNotFound,
    NotAMember,
}

/// Reference to a house by id, optionally with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRefDto {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Identity as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDto {
    pub id: String,
    pub name: String,
}

impl From<&UserIdentity> for IdentityDto {
    fn from(identity: &UserIdentity) -> Self {
        Self {
            id: identity.id.as_str().to_string(),
            name: identity.name.as_str().to_string(),
        }
    }
}

/// Buffered chat message inside a `house-joined` snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub sender: IdentityDto,
    pub message: String,
    pub timestamp: i64,
}

impl From<&ChatMessage> for MessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            sender: IdentityDto::from(&message.sender),
            message: message.content.as_str().to_string(),
            timestamp: message.timestamp.value(),
        }
    }
}

/// House snapshot carried by `house-joined`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseDto {
    pub id: String,
    pub name: String,
    pub private: bool,
    pub messages: Vec<MessageDto>,
}

impl From<&HouseSnapshot> for HouseDto {
    fn from(snapshot: &HouseSnapshot) -> Self {
        Self {
            id: snapshot.id.as_str().to_string(),
            name: snapshot.name.as_str().to_string(),
            private: snapshot.private,
            messages: snapshot.messages.iter().map(MessageDto::from).collect(),
        }
    }
}
