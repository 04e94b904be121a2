//! Room membership and fan-out for the Scrawl relay.
//!
//! # Key types
//!
//! - [`ConnectionRegistry`], every live connection, its outbound sink, and
//!   its current room membership
//! - [`RoomDirectory`], room membership sets, rosters, and broadcast scopes
//! - [`RoomStatus`], the waiting / in-progress session state
//! - [`GuessPolicy`], the injected strategy that judges guesses
//!
//! # Concurrency
//!
//! Nothing in this crate is thread-safe by itself; the structures use
//! plain `HashMap`s on purpose. The server owns one registry and one
//! directory behind a single async mutex, mutates them synchronously
//! while holding the lock, and releases the lock before any await point.
//! Keeping the locking at that one seam is what makes the "membership
//! changes happen before any suspension" guarantee hold by design rather
//! than by accident.

mod directory;
mod error;
mod guess;
mod registry;
mod status;

pub use directory::{Room, RoomDirectory};
pub use error::RoomError;
pub use guess::{GuessOutcome, GuessPolicy, RandomGuessPolicy};
pub use registry::{ConnectionRegistry, Departure, EventSink};
pub use status::RoomStatus;
