/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listening socket failed.
    #[error("bind failed: {0}")]
    Bind(#[source] std::io::Error),

    /// Accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),

    /// The WebSocket upgrade handshake failed.
    #[error("websocket handshake failed: {0}")]
    Handshake(String),

    /// Sending a frame failed; the peer is usually gone.
    #[error("send failed: {0}")]
    Send(String),

    /// Receiving a frame failed.
    #[error("receive failed: {0}")]
    Receive(String),

    /// A binary frame arrived that was not valid UTF-8.
    /// The relay protocol is JSON text; such frames are undecodable.
    #[error("received a non-UTF-8 binary frame")]
    NonUtf8Frame,
}
