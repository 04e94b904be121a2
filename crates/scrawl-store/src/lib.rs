//! Persistence gateway for the Scrawl relay.
//!
//! The relay records session membership, session status, and finished
//! rounds in an external store. Writes are best-effort and attempt-once:
//! the realtime path never waits on a retry and never fails because the
//! store did. How each failure surfaces is the caller's decision (the
//! lifecycle controller swallows membership and status failures, the
//! router turns a round-save failure into a soft error event).
//!
//! [`SessionStore`] is the seam: the server is generic over it, so tests
//! substitute an in-memory recorder and production wires up [`RestStore`].

#![allow(async_fn_in_trait)]

mod error;
mod rest;

pub use error::StoreError;
pub use rest::RestStore;

use serde_json::Value;

/// Asynchronous adapter to the external session store.
///
/// `Send + Sync + 'static` because the store is shared across every
/// connection handler task for the lifetime of the server.
pub trait SessionStore: Send + Sync + 'static {
    /// Inserts a membership row for `user_id` in session `session_id`.
    fn record_join(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes the membership row for `user_id` in session `session_id`.
    fn record_leave(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates the session's status column.
    fn update_session_status(
        &self,
        session_id: &str,
        status: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Inserts a round row carrying the client's round payload.
    fn record_round(
        &self,
        session_id: &str,
        round: &Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
