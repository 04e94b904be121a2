//! The event router: per-event preconditions, fan-out scopes, and acks.
//!
//! Every handler follows the same shape: lock the coordinator, mutate,
//! collect the target sinks, unlock, send. Sends are non-blocking channel
//! writes, so fan-out always completes before the handler reaches an
//! await point; the store call (where there is one) comes last and its
//! outcome never gates a broadcast.

use scrawl_protocol::{ClientEvent, RoomId, ServerEvent};
use scrawl_room::{EventSink, GuessPolicy, RoomError};
use scrawl_store::SessionStore;
use scrawl_transport::ConnectionId;
use serde_json::Value;

use crate::lifecycle;
use crate::server::ServerState;

/// Dispatches one inbound event.
///
/// Protocol violations (events the sender's membership state does not
/// permit) are dropped and logged; they never close the connection and
/// never crash the relay.
pub(crate) async fn dispatch<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    event: ClientEvent,
) where
    S: SessionStore,
    P: GuessPolicy,
{
    let result = match event {
        ClientEvent::JoinRoom { room_id, user } => {
            lifecycle::join(state, conn_id, room_id, user).await
        }
        ClientEvent::StartGame { room_id } => {
            lifecycle::start_game(state, conn_id, room_id).await
        }
        ClientEvent::Drawing { data } => relay_drawing(state, conn_id, data).await,
        ClientEvent::Guess { guess } => relay_guess(state, conn_id, guess).await,
        ClientEvent::SaveRound { round } => save_round(state, conn_id, round).await,
        ClientEvent::ClearCanvas { room_id } => clear_canvas(state, conn_id, room_id).await,
    };

    if let Err(violation) = result {
        tracing::warn!(%conn_id, %violation, "protocol violation, event dropped");
    }
}

/// Sends one event to every sink. Best-effort: a closed sink means that
/// peer is mid-disconnect.
pub(crate) fn send_all(sinks: Vec<EventSink>, event: ServerEvent) {
    for sink in sinks {
        let _ = sink.send(event.clone());
    }
}

/// `drawing`: relay the stroke to the other members of the sender's room.
async fn relay_drawing<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    data: Value,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let targets = {
        let coord = state.coord.lock().await;
        let (room_id, _) = coord
            .connections
            .membership(conn_id)
            .ok_or(RoomError::NotInRoom(conn_id))?;
        let scope = coord.rooms.broadcast_scope(&room_id, Some(conn_id));
        coord.connections.sinks_for(&scope)
    };

    send_all(targets, ServerEvent::Drawing { data });
    Ok(())
}

/// `guess`: echo to the whole room (sender included), deliver the verdict
/// to the sender alone, and push the updated roster to the others when
/// the guess scored.
async fn relay_guess<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    guess: String,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let (user, outcome, echo, sender_sink, update) = {
        let mut coord = state.coord.lock().await;
        let (room_id, user) = coord
            .connections
            .membership(conn_id)
            .ok_or(RoomError::NotInRoom(conn_id))?;
        let room = coord
            .rooms
            .room(&room_id)
            .ok_or_else(|| RoomError::UnknownRoom(room_id.clone()))?;

        let outcome = state.guess.evaluate(&guess, room);

        let update = if outcome.correct {
            let players = coord.rooms.award(&room_id, conn_id, outcome.points);
            let others = coord.rooms.broadcast_scope(&room_id, Some(conn_id));
            Some((coord.connections.sinks_for(&others), players))
        } else {
            None
        };

        let everyone = coord.rooms.broadcast_scope(&room_id, None);
        let echo = coord.connections.sinks_for(&everyone);
        let sender_sink = coord.connections.sink(conn_id);
        (user, outcome, echo, sender_sink, update)
    };

    send_all(echo, ServerEvent::Guess { user, guess });

    if let Some(sink) = sender_sink {
        let _ = sink.send(ServerEvent::GuessResult {
            correct: outcome.correct,
            points: outcome.points,
        });
    }

    if let Some((sinks, players)) = update {
        send_all(sinks, ServerEvent::PlayersUpdate { players });
    }

    Ok(())
}

/// `saveRound`: persist the round and ack the sender; a store failure
/// becomes a soft `saveRoundError`, not a dropped connection.
async fn save_round<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    round: Value,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let (room_id, sender_sink) = {
        let coord = state.coord.lock().await;
        let (room_id, _) = coord
            .connections
            .membership(conn_id)
            .ok_or(RoomError::NotInRoom(conn_id))?;
        (room_id, coord.connections.sink(conn_id))
    };

    let ack = match state.store.record_round(room_id.as_str(), &round).await {
        Ok(()) => ServerEvent::SaveRoundSuccess,
        Err(e) => {
            tracing::error!(%conn_id, %room_id, error = %e, "round save failed");
            ServerEvent::SaveRoundError {
                message: "round save failed".to_string(),
            }
        }
    };

    if let Some(sink) = sender_sink {
        let _ = sink.send(ack);
    }
    Ok(())
}

/// `clearCanvas`: wipe notification to the other members. The named room
/// must be the one the sender is actually in.
async fn clear_canvas<S, P>(
    state: &ServerState<S, P>,
    conn_id: ConnectionId,
    room_id: RoomId,
) -> Result<(), RoomError>
where
    S: SessionStore,
    P: GuessPolicy,
{
    let targets = {
        let coord = state.coord.lock().await;
        let (current, _) = coord
            .connections
            .membership(conn_id)
            .ok_or(RoomError::NotInRoom(conn_id))?;
        if current != room_id {
            return Err(RoomError::NotAMember(conn_id, room_id));
        }
        let scope = coord.rooms.broadcast_scope(&room_id, Some(conn_id));
        coord.connections.sinks_for(&scope)
    };

    send_all(targets, ServerEvent::CanvasCleared);
    Ok(())
}
