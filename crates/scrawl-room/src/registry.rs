//! The connection registry: every live connection and where it is.

use std::collections::HashMap;

use scrawl_protocol::{RoomId, ServerEvent, UserIdentity};
use scrawl_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::RoomError;

/// Channel sender for delivering outbound events to one connection.
///
/// The receiving half is drained by that connection's writer pump.
/// Sends are non-blocking, which is what lets fan-out complete before
/// any handler reaches an await point.
pub type EventSink = mpsc::UnboundedSender<ServerEvent>;

/// What a connection leaves behind when its room membership ends.
#[derive(Debug, Clone)]
pub struct Departure {
    pub room_id: RoomId,
    pub identity: UserIdentity,
}

struct Entry {
    sink: EventSink,
    membership: Option<(RoomId, UserIdentity)>,
}

/// Tracks each live connection, its outbound sink, and its current room.
///
/// A connection is a member of at most one room at a time: `set_room`
/// replaces any previous membership and hands it back so the caller can
/// settle the departure (notify the old room, delete the persisted row).
pub struct ConnectionRegistry {
    entries: HashMap<ConnectionId, Entry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a freshly accepted connection with its outbound sink.
    pub fn register(&mut self, id: ConnectionId, sink: EventSink) {
        self.entries.insert(
            id,
            Entry {
                sink,
                membership: None,
            },
        );
        tracing::debug!(%id, "connection registered");
    }

    /// Removes a connection. Idempotent: unknown ids are a no-op.
    ///
    /// Returns the room membership the connection held, if any, so the
    /// lifecycle controller can notify the room and persist the leave.
    pub fn unregister(&mut self, id: ConnectionId) -> Option<Departure> {
        let entry = self.entries.remove(&id)?;
        tracing::debug!(%id, "connection unregistered");
        entry.membership.map(|(room_id, identity)| Departure {
            room_id,
            identity,
        })
    }

    /// Records a connection's room membership, replacing any previous one.
    ///
    /// Returns the membership that was replaced (for join-over-join the
    /// caller decides whether that means a room switch or an idempotent
    /// re-join of the same room).
    ///
    /// # Errors
    /// Returns [`RoomError::UnknownConnection`] if the connection is not
    /// registered.
    pub fn set_room(
        &mut self,
        id: ConnectionId,
        room_id: RoomId,
        identity: UserIdentity,
    ) -> Result<Option<Departure>, RoomError> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(RoomError::UnknownConnection(id))?;
        let previous = entry.membership.replace((room_id, identity));
        Ok(previous.map(|(room_id, identity)| Departure {
            room_id,
            identity,
        }))
    }

    /// The room and identity a connection currently holds, if any.
    pub fn membership(&self, id: ConnectionId) -> Option<(RoomId, UserIdentity)> {
        self.entries.get(&id)?.membership.clone()
    }

    /// The outbound sink for one connection.
    pub fn sink(&self, id: ConnectionId) -> Option<EventSink> {
        self.entries.get(&id).map(|entry| entry.sink.clone())
    }

    /// The outbound sinks for a set of connections, skipping any that are
    /// already gone.
    pub fn sinks_for(&self, ids: &[ConnectionId]) -> Vec<EventSink> {
        ids.iter()
            .filter_map(|id| self.entries.get(id))
            .map(|entry| entry.sink.clone())
            .collect()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use scrawl_protocol::UserId;

    use super::*;

    fn cid(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn alice() -> UserIdentity {
        UserIdentity {
            id: UserId::from("1"),
            name: "Alice".into(),
        }
    }

    fn sink() -> (EventSink, mpsc::UnboundedReceiver<ServerEvent>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn test_register_and_contains() {
        let mut reg = ConnectionRegistry::new();
        assert!(reg.is_empty());

        reg.register(cid(1), sink().0);

        assert!(reg.contains(cid(1)));
        assert!(!reg.contains(cid(2)));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_unregister_unknown_is_noop() {
        let mut reg = ConnectionRegistry::new();
        assert!(reg.unregister(cid(99)).is_none());
    }

    #[test]
    fn test_unregister_without_membership_returns_none() {
        let mut reg = ConnectionRegistry::new();
        reg.register(cid(1), sink().0);

        assert!(reg.unregister(cid(1)).is_none());
        assert!(!reg.contains(cid(1)));
    }

    #[test]
    fn test_unregister_with_membership_returns_departure() {
        let mut reg = ConnectionRegistry::new();
        reg.register(cid(1), sink().0);
        reg.set_room(cid(1), RoomId::from("R1"), alice()).unwrap();

        let departure = reg.unregister(cid(1)).expect("should hold membership");

        assert_eq!(departure.room_id, RoomId::from("R1"));
        assert_eq!(departure.identity.name, "Alice");
    }

    #[test]
    fn test_set_room_unknown_connection_fails() {
        let mut reg = ConnectionRegistry::new();
        let result = reg.set_room(cid(1), RoomId::from("R1"), alice());
        assert!(matches!(result, Err(RoomError::UnknownConnection(c)) if c == cid(1)));
    }

    #[test]
    fn test_set_room_returns_replaced_membership() {
        let mut reg = ConnectionRegistry::new();
        reg.register(cid(1), sink().0);

        let first = reg.set_room(cid(1), RoomId::from("R1"), alice()).unwrap();
        assert!(first.is_none());

        let second = reg.set_room(cid(1), RoomId::from("R2"), alice()).unwrap();
        let previous = second.expect("should return the replaced membership");
        assert_eq!(previous.room_id, RoomId::from("R1"));

        let (room, _) = reg.membership(cid(1)).unwrap();
        assert_eq!(room, RoomId::from("R2"));
    }

    #[test]
    fn test_sink_delivers_events() {
        let mut reg = ConnectionRegistry::new();
        let (tx, mut rx) = sink();
        reg.register(cid(1), tx);

        reg.sink(cid(1))
            .expect("sink should exist")
            .send(ServerEvent::CanvasCleared)
            .unwrap();

        assert_eq!(rx.try_recv().unwrap(), ServerEvent::CanvasCleared);
    }

    #[test]
    fn test_sinks_for_skips_missing_connections() {
        let mut reg = ConnectionRegistry::new();
        reg.register(cid(1), sink().0);
        reg.register(cid(2), sink().0);

        let sinks = reg.sinks_for(&[cid(1), cid(2), cid(3)]);
        assert_eq!(sinks.len(), 2);
    }
}
