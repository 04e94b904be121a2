//! WebSocket transport for the Scrawl relay.
//!
//! Exposes a [`WsListener`] that accepts client connections and hands out
//! [`WsConnection`]s. A connection is split into a [`WsReader`] and a
//! [`WsWriter`] so the inbound event loop and the outbound fan-out pump can
//! run as separate tasks without contending on the socket.
//!
//! The relay speaks a text-frame JSON protocol; this crate only moves
//! strings. Decoding those strings into events happens one layer up, in
//! `scrawl-protocol`.

mod error;
mod websocket;

pub use error::TransportError;
pub use websocket::{WsConnection, WsListener, WsReader, WsWriter};

use std::fmt;

/// Opaque identifier for one live client connection.
///
/// Minted by the listener from a process-wide counter; never reused within
/// a server's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
        assert_ne!(ConnectionId::new(1), ConnectionId::new(2));
    }
}
