//! The room directory: membership sets, rosters, and broadcast scopes.

use std::collections::HashMap;

use scrawl_protocol::{PlayerScore, RoomId, UserIdentity};
use scrawl_transport::ConnectionId;

use crate::RoomStatus;

struct Member {
    conn: ConnectionId,
    identity: UserIdentity,
    score: u32,
}

/// One room: its member set and session status.
///
/// Members are kept in join order so roster snapshots are deterministic.
pub struct Room {
    members: Vec<Member>,
    status: RoomStatus,
}

impl Room {
    fn new() -> Self {
        Self {
            members: Vec::new(),
            status: RoomStatus::Waiting,
        }
    }

    fn member_index(&self, conn: ConnectionId) -> Option<usize> {
        self.members.iter().position(|m| m.conn == conn)
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn contains(&self, conn: ConnectionId) -> bool {
        self.member_index(conn).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The current roster, in join order.
    pub fn roster(&self) -> Vec<PlayerScore> {
        self.members
            .iter()
            .map(|m| PlayerScore {
                id: m.identity.id.clone(),
                name: m.identity.name.clone(),
                score: m.score,
            })
            .collect()
    }
}

/// Maps room ids to rooms and answers broadcast-scope queries.
///
/// Rooms are created implicitly by the first join and are kept around
/// when they empty out; an empty room simply accumulates no further
/// broadcasts.
pub struct RoomDirectory {
    rooms: HashMap<RoomId, Room>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Adds a connection to a room and returns the roster snapshot
    /// including the joiner. Never fails: an unknown room id creates the
    /// room.
    ///
    /// Re-joining a room the connection is already a member of refreshes
    /// the identity in place and keeps the accumulated score; membership
    /// is never duplicated.
    pub fn join(
        &mut self,
        room_id: &RoomId,
        conn: ConnectionId,
        identity: UserIdentity,
    ) -> Vec<PlayerScore> {
        let room = self.rooms.entry(room_id.clone()).or_insert_with(Room::new);
        match room.member_index(conn) {
            Some(i) => room.members[i].identity = identity,
            None => {
                room.members.push(Member {
                    conn,
                    identity,
                    score: 0,
                });
            }
        }
        tracing::info!(%room_id, %conn, members = room.members.len(), "joined room");
        room.roster()
    }

    /// Removes a connection from a room. No-op if either is absent.
    ///
    /// Returns the identity of the departed member, for the `userLeft`
    /// notification.
    pub fn leave(&mut self, room_id: &RoomId, conn: ConnectionId) -> Option<UserIdentity> {
        let room = self.rooms.get_mut(room_id)?;
        let index = room.member_index(conn)?;
        let member = room.members.remove(index);
        tracing::info!(%room_id, %conn, members = room.members.len(), "left room");
        Some(member.identity)
    }

    /// All current members of a room, optionally excluding one connection
    /// (the sender). Unknown rooms yield an empty scope.
    pub fn broadcast_scope(
        &self,
        room_id: &RoomId,
        excluding: Option<ConnectionId>,
    ) -> Vec<ConnectionId> {
        let Some(room) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        room.members
            .iter()
            .map(|m| m.conn)
            .filter(|conn| Some(*conn) != excluding)
            .collect()
    }

    /// Sets a room's session status. Returns `false` if the room does not
    /// exist.
    pub fn set_status(&mut self, room_id: &RoomId, status: RoomStatus) -> bool {
        match self.rooms.get_mut(room_id) {
            Some(room) => {
                room.status = status;
                true
            }
            None => false,
        }
    }

    pub fn status(&self, room_id: &RoomId) -> Option<RoomStatus> {
        self.rooms.get(room_id).map(Room::status)
    }

    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// The current roster of a room; empty for unknown rooms.
    pub fn roster(&self, room_id: &RoomId) -> Vec<PlayerScore> {
        self.rooms
            .get(room_id)
            .map(Room::roster)
            .unwrap_or_default()
    }

    /// Adds points to one member's score and returns the updated roster.
    ///
    /// Returns an empty roster if the room or member is gone; the caller
    /// then has nothing to broadcast.
    pub fn award(
        &mut self,
        room_id: &RoomId,
        conn: ConnectionId,
        points: u32,
    ) -> Vec<PlayerScore> {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return Vec::new();
        };
        let Some(index) = room.member_index(conn) else {
            return Vec::new();
        };
        room.members[index].score += points;
        room.roster()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new()
    }
}
