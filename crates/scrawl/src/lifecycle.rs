//! Session lifecycle controller: join, game start, and disconnect.
//!
//! These transitions touch both the realtime state and the external
//! store. The order is always the same: mutate under the lock, fan out,
//! then fire the best-effort persistence call. Membership and status
//! write failures are logged and swallowed; the realtime path has
//! already proceeded by the time they are known.

use scrawl_protocol::{RoomId, ServerEvent, UserIdentity};
use scrawl_room::{GuessPolicy, RoomError, RoomStatus};
use scrawl_store::SessionStore;
use scrawl_transport::ConnectionId;

use crate::router::send_all;
use crate::server::ServerState;

/// `joinRoom`: record membership, answer the joiner with the roster, and
/// announce the arrival to the rest of the room.
///
/// Re-joining the current room is an idempotent refresh: the identity is
/// replaced in place, nothing is re-announced, and no duplicate
/// membership row is written. Joining a different room settles the old
/// membership first (a `userLeft` to the old room and a membership
/// delete).
pub(crate) async fn join<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    room_id: RoomId,
    user: UserIdentity,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let (roster, sender_sink, others, rejoin, switched) = {
        let mut coord = state.coord.lock().await;
        let previous = coord
            .connections
            .set_room(conn_id, room_id.clone(), user.clone())?;

        let rejoin = previous.as_ref().is_some_and(|dep| dep.room_id == room_id);
        let switched = if rejoin {
            None
        } else {
            previous.and_then(|dep| {
                coord.rooms.leave(&dep.room_id, conn_id)?;
                let scope = coord.rooms.broadcast_scope(&dep.room_id, None);
                Some((coord.connections.sinks_for(&scope), dep))
            })
        };

        let roster = coord.rooms.join(&room_id, conn_id, user.clone());
        let others = coord
            .connections
            .sinks_for(&coord.rooms.broadcast_scope(&room_id, Some(conn_id)));
        let sender_sink = coord.connections.sink(conn_id);
        (roster, sender_sink, others, rejoin, switched)
    };

    let left = switched.map(|(sinks, dep)| {
        send_all(
            sinks,
            ServerEvent::UserLeft {
                user: dep.identity.clone(),
            },
        );
        dep
    });

    if let Some(sink) = sender_sink {
        let _ = sink.send(ServerEvent::JoinRoomSuccess { players: roster });
    }
    if !rejoin {
        send_all(others, ServerEvent::UserJoined { user: user.clone() });
    }
    tracing::info!(%conn_id, %room_id, user_id = %user.id, "user joined room");

    if let Some(dep) = left {
        if let Err(e) = state
            .store
            .record_leave(dep.room_id.as_str(), dep.identity.id.as_str())
            .await
        {
            tracing::error!(%conn_id, room_id = %dep.room_id, error = %e, "membership delete failed");
        }
    }
    if !rejoin {
        if let Err(e) = state
            .store
            .record_join(room_id.as_str(), user.id.as_str())
            .await
        {
            tracing::error!(%conn_id, %room_id, error = %e, "membership insert failed");
        }
    }

    Ok(())
}

/// `startGame`: move the room's session to in-progress and tell everyone.
///
/// The transition is one-way and idempotent in effect; repeated starts
/// keep the room in progress and still broadcast. The status row is
/// written first, but its outcome never gates the start.
pub(crate) async fn start_game<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    room_id: RoomId,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let targets = {
        let mut coord = state.coord.lock().await;
        if !coord.rooms.set_status(&room_id, RoomStatus::InProgress) {
            return Err(RoomError::UnknownRoom(room_id));
        }
        coord
            .connections
            .sinks_for(&coord.rooms.broadcast_scope(&room_id, None))
    };

    if let Err(e) = state
        .store
        .update_session_status(room_id.as_str(), RoomStatus::InProgress.as_str())
        .await
    {
        tracing::error!(%conn_id, %room_id, error = %e, "session status update failed");
    }

    send_all(targets, ServerEvent::GameStarted);
    tracing::info!(%conn_id, %room_id, "game started");
    Ok(())
}

/// Connection teardown: unregister, notify the room, delete the
/// membership row. Safe to call for connections that never joined a
/// room; unregistering is idempotent.
pub(crate) async fn disconnect<S, P>(state: &ServerState<S, P>, conn_id: ConnectionId)
where
    S: SessionStore,
    P: GuessPolicy,
{
    let departed = {
        let mut coord = state.coord.lock().await;
        let departure = coord.connections.unregister(conn_id);
        departure.map(|dep| {
            coord.rooms.leave(&dep.room_id, conn_id);
            let scope = coord.rooms.broadcast_scope(&dep.room_id, None);
            (coord.connections.sinks_for(&scope), dep)
        })
    };

    let Some((sinks, dep)) = departed else {
        tracing::debug!(%conn_id, "connection closed without room membership");
        return;
    };

    send_all(
        sinks,
        ServerEvent::UserLeft {
            user: dep.identity.clone(),
        },
    );
    tracing::info!(%conn_id, room_id = %dep.room_id, user_id = %dep.identity.id, "user left");

    if let Err(e) = state
        .store
        .record_leave(dep.room_id.as_str(), dep.identity.id.as_str())
        .await
    {
        tracing::error!(%conn_id, room_id = %dep.room_id, error = %e, "membership delete failed");
    }
}
