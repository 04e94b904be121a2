//! Identity and roster types shared by both directions of the protocol.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A client-supplied user identifier.
///
/// Newtype over `String`: you cannot accidentally pass a `UserId` where a
/// `RoomId` is expected. `#[serde(transparent)]` keeps the wire shape a
/// plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A client-supplied room identifier.
///
/// Rooms have no explicit creation step: the first join of an unknown id
/// creates the room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Who a connection claims to be, supplied once at join time.
///
/// Immutable for the connection's lifetime and not validated against any
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub name: String,
}

/// One roster entry as carried by `joinRoomSuccess` and `playersUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub id: UserId,
    pub name: String,
    pub score: u32,
}
