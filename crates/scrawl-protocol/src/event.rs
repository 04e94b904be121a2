//! The canonical event set, both directions.
//!
//! Events are internally tagged on `"type"` with camelCase tags and
//! fields, so `ClientEvent::JoinRoom` travels as
//! `{"type":"joinRoom","roomId":...,"user":...}`. Drawing strokes and
//! round payloads are opaque JSON: the relay fans them out without
//! interpreting them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{PlayerScore, RoomId, UserIdentity};

/// Everything a client can send to the relay.
///
/// Per-event preconditions and fan-out scopes are enforced by the event
/// router, not here; this type only fixes the wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientEvent {
    /// Join a room, creating it implicitly if it does not exist yet.
    #[serde(rename_all = "camelCase")]
    JoinRoom { room_id: RoomId, user: UserIdentity },

    /// Move an existing room's session from waiting to in progress.
    #[serde(rename_all = "camelCase")]
    StartGame { room_id: RoomId },

    /// A drawing stroke, relayed verbatim to the other room members.
    Drawing { data: Value },

    /// A guess at the current drawing.
    Guess { guess: String },

    /// Persist the finished round's payload.
    SaveRound { round: Value },

    /// Wipe the shared canvas for the other room members.
    #[serde(rename_all = "camelCase")]
    ClearCanvas { room_id: RoomId },
}

/// Everything the relay can send to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Direct reply to a successful `joinRoom`, carrying the roster
    /// snapshot including the joiner.
    JoinRoomSuccess { players: Vec<PlayerScore> },

    /// Another member joined the sender's room.
    UserJoined { user: UserIdentity },

    /// A member left the sender's room (or disconnected).
    UserLeft { user: UserIdentity },

    /// The room's game session started.
    GameStarted,

    /// A drawing stroke from another member.
    Drawing { data: Value },

    /// A guess, echoed to every member including the guesser.
    Guess { user: UserIdentity, guess: String },

    /// Private verdict on the sender's own guess.
    GuessResult { correct: bool, points: u32 },

    /// Updated roster after a score change.
    PlayersUpdate { players: Vec<PlayerScore> },

    /// Another member cleared the canvas.
    CanvasCleared,

    /// Direct ack for a persisted round.
    SaveRoundSuccess,

    /// The round could not be persisted; the game goes on.
    SaveRoundError { message: String },
}

#[cfg(test)]
mod tests {
    //! The wire shapes below are load-bearing: game clients match on the
    //! exact `"type"` strings and field names.

    use serde_json::json;

    use super::*;
    use crate::UserId;

    fn alice() -> UserIdentity {
        UserIdentity {
            id: UserId::from("1"),
            name: "Alice".into(),
        }
    }

    // =====================================================================
    // ClientEvent shapes
    // =====================================================================

    #[test]
    fn test_join_room_json_shape() {
        let event = ClientEvent::JoinRoom {
            room_id: RoomId::from("R1"),
            user: alice(),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "joinRoom");
        assert_eq!(json["roomId"], "R1");
        assert_eq!(json["user"]["id"], "1");
        assert_eq!(json["user"]["name"], "Alice");
    }

    #[test]
    fn test_join_room_decodes_from_wire_form() {
        let wire = r#"{"type":"joinRoom","roomId":"R1","user":{"id":"1","name":"Alice"}}"#;
        let event: ClientEvent = serde_json::from_str(wire).unwrap();
        assert_eq!(
            event,
            ClientEvent::JoinRoom {
                room_id: RoomId::from("R1"),
                user: alice(),
            }
        );
    }

    #[test]
    fn test_start_game_json_shape() {
        let event = ClientEvent::StartGame {
            room_id: RoomId::from("R1"),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "startGame");
        assert_eq!(json["roomId"], "R1");
    }

    #[test]
    fn test_drawing_carries_opaque_payload() {
        let event = ClientEvent::Drawing {
            data: json!({"x": 1, "y": 2}),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "drawing");
        assert_eq!(json["data"]["x"], 1);
        assert_eq!(json["data"]["y"], 2);

        let back: ClientEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_guess_round_trip() {
        let event = ClientEvent::Guess {
            guess: "cat".into(),
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: ClientEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_save_round_round_trip() {
        let event = ClientEvent::SaveRound {
            round: json!({"word": "cat", "strokes": 12}),
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: ClientEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_clear_canvas_json_shape() {
        let event = ClientEvent::ClearCanvas {
            room_id: RoomId::from("R1"),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "clearCanvas");
        assert_eq!(json["roomId"], "R1");
    }

    // =====================================================================
    // ServerEvent shapes
    // =====================================================================

    #[test]
    fn test_join_room_success_json_shape() {
        let event = ServerEvent::JoinRoomSuccess {
            players: vec![PlayerScore {
                id: UserId::from("1"),
                name: "Alice".into(),
                score: 0,
            }],
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "joinRoomSuccess");
        assert_eq!(json["players"][0]["name"], "Alice");
        assert_eq!(json["players"][0]["score"], 0);
    }

    #[test]
    fn test_user_joined_and_left_json_shapes() {
        let joined: Value =
            serde_json::to_value(ServerEvent::UserJoined { user: alice() }).unwrap();
        assert_eq!(joined["type"], "userJoined");
        assert_eq!(joined["user"]["name"], "Alice");

        let left: Value =
            serde_json::to_value(ServerEvent::UserLeft { user: alice() }).unwrap();
        assert_eq!(left["type"], "userLeft");
    }

    #[test]
    fn test_unit_events_serialize_as_bare_tags() {
        assert_eq!(
            serde_json::to_string(&ServerEvent::GameStarted).unwrap(),
            r#"{"type":"gameStarted"}"#
        );
        assert_eq!(
            serde_json::to_string(&ServerEvent::CanvasCleared).unwrap(),
            r#"{"type":"canvasCleared"}"#
        );
        assert_eq!(
            serde_json::to_string(&ServerEvent::SaveRoundSuccess).unwrap(),
            r#"{"type":"saveRoundSuccess"}"#
        );
    }

    #[test]
    fn test_guess_result_json_shape() {
        let event = ServerEvent::GuessResult {
            correct: true,
            points: 10,
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "guessResult");
        assert_eq!(json["correct"], true);
        assert_eq!(json["points"], 10);
    }

    #[test]
    fn test_guess_echo_json_shape() {
        let event = ServerEvent::Guess {
            user: alice(),
            guess: "dog".into(),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "guess");
        assert_eq!(json["user"]["id"], "1");
        assert_eq!(json["guess"], "dog");
    }

    #[test]
    fn test_players_update_round_trip() {
        let event = ServerEvent::PlayersUpdate {
            players: vec![
                PlayerScore {
                    id: UserId::from("1"),
                    name: "Alice".into(),
                    score: 10,
                },
                PlayerScore {
                    id: UserId::from("2"),
                    name: "Bob".into(),
                    score: 0,
                },
            ],
        };
        let text = serde_json::to_string(&event).unwrap();
        let back: ServerEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_save_round_error_json_shape() {
        let event = ServerEvent::SaveRoundError {
            message: "round save failed".into(),
        };
        let json: Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "saveRoundError");
        assert_eq!(json["message"], "round save failed");
    }

    // =====================================================================
    // Malformed input
    // =====================================================================

    #[test]
    fn test_decode_unknown_event_type_fails() {
        let wire = r#"{"type":"flyToMoon","speed":9000}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(wire);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_fields_fails() {
        let wire = r#"{"type":"joinRoom","roomId":"R1"}"#;
        let result: Result<ClientEvent, _> = serde_json::from_str(wire);
        assert!(result.is_err(), "joinRoom without user must not parse");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<ClientEvent, _> = serde_json::from_str("not json at all");
        assert!(result.is_err());
    }
}
