//! Unified error type for the relay.

use scrawl_protocol::ProtocolError;
use scrawl_room::RoomError;
use scrawl_store::StoreError;
use scrawl_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` conversions let `?` lift sub-crate errors anywhere in
/// the server. Only configuration and bind failures are ever fatal;
/// everything else is logged and survived.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A protocol violation: an event the sender's membership state does
    /// not permit. Dropped and logged, never fatal.
    #[error(transparent)]
    Violation(#[from] RoomError),

    /// A persistence error from the external store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A startup configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::NonUtf8Frame;
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Transport(_)));
        assert!(relay_err.to_string().contains("non-UTF-8"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidEvent("bad".into());
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::NotInRoom(scrawl_transport::ConnectionId::new(1));
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Violation(_)));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::Rejected {
            op: "round insert",
            status: 500,
            body: String::new(),
        };
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Store(_)));
        assert!(relay_err.to_string().contains("round insert"));
    }

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::MissingVar("STORE_URL");
        let relay_err: RelayError = err.into();
        assert!(matches!(relay_err, RelayError::Config(_)));
    }
}
