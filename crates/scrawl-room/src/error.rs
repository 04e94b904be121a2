//! Error types for the room layer.
//!
//! These describe protocol violations: a client asked for something its
//! current membership state does not permit. The router logs and drops
//! the offending event; none of these are fatal to the connection or the
//! process.

use scrawl_protocol::RoomId;
use scrawl_transport::ConnectionId;

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The connection is not registered (already unregistered, or never was).
    #[error("connection {0} is not registered")]
    UnknownConnection(ConnectionId),

    /// The connection has not joined any room yet.
    #[error("connection {0} is not in any room")]
    NotInRoom(ConnectionId),

    /// The connection named a room it is not a member of.
    #[error("connection {0} is not a member of room {1}")]
    NotAMember(ConnectionId, RoomId),

    /// The operation requires an existing room.
    #[error("room {0} does not exist")]
    UnknownRoom(RoomId),
}
