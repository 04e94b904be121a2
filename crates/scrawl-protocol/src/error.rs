//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding events.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown event tag, or
    /// missing fields.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The event parsed but is invalid at the protocol level.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}
