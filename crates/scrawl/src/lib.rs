//! # Scrawl
//!
//! Realtime relay server for a multiplayer drawing and guessing game.
//! Clients join rooms over WebSocket, strokes and guesses fan out to the
//! right subset of room members, and round results are persisted to an
//! external store on a best-effort basis.
//!
//! ```text
//! transport (text frames) -> protocol (events) -> router/lifecycle
//!                                                     |         \
//!                                                 room state   store
//! ```
//!
//! The interesting guarantees live in the router and lifecycle modules:
//! membership mutation and fan-out target collection happen synchronously
//! under one lock, so broadcasts are never gated on (or reordered by) the
//! persistence calls that follow them.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use scrawl::{RandomGuessPolicy, RelayServerBuilder, RestStore};
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), scrawl::RelayError> {
//! let store = RestStore::new(
//!     "https://store.example.com".into(),
//!     "service-key".into(),
//!     Duration::from_secs(10),
//! )?;
//! let server = RelayServerBuilder::new()
//!     .bind("0.0.0.0:3001")
//!     .build(store, RandomGuessPolicy::default())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod lifecycle;
mod router;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::RelayError;
pub use server::{RelayServer, RelayServerBuilder};

// Re-exports for embedders and integration tests, so a single `scrawl`
// dependency is enough to drive the server.
pub use scrawl_protocol::{
    ClientEvent, Codec, JsonCodec, PlayerScore, ProtocolError, RoomId, ServerEvent, UserId,
    UserIdentity,
};
pub use scrawl_room::{
    GuessOutcome, GuessPolicy, RandomGuessPolicy, Room, RoomError, RoomStatus,
};
pub use scrawl_store::{RestStore, SessionStore, StoreError};
pub use scrawl_transport::{ConnectionId, TransportError};
