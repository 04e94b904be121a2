//! Wire protocol for the Scrawl relay.
//!
//! This crate defines the "language" that clients and the relay speak:
//!
//! - **Types** ([`RoomId`], [`UserId`], [`UserIdentity`], [`PlayerScore`])
//!   and **events** ([`ClientEvent`], [`ServerEvent`]), the structures
//!   that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]), how events are converted
//!   to and from text frames.
//! - **Errors** ([`ProtocolError`]), what can go wrong while encoding or
//!   decoding.
//!
//! # Protocol
//!
//! Two divergent client dialects were in circulation historically (a
//! hyphenated one carrying only join/start, and a camelCase one carrying
//! the drawing events). This crate speaks a single canonical event set:
//! the camelCase dialect, extended with `startGame`. Every event is an
//! internally tagged JSON object, e.g.
//!
//! ```json
//! {"type":"joinRoom","roomId":"R1","user":{"id":"1","name":"Alice"}}
//! ```
//!
//! The protocol layer sits between transport (text frames) and the room
//! layer (membership, fan-out). It knows nothing about connections or
//! rooms, only how to serialize and deserialize events.

mod codec;
mod error;
mod event;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use event::{ClientEvent, ServerEvent};
pub use types::{PlayerScore, RoomId, UserId, UserIdentity};
