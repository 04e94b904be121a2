//! WebSocket listener and connection halves, via `tokio-tungstenite`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

use crate::{ConnectionId, TransportError};

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = WebSocketStream<TcpStream>;

/// Accepts incoming WebSocket connections.
pub struct WsListener {
    listener: TcpListener,
}

impl WsListener {
    /// Binds the listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::Bind)?;
        tracing::info!(addr, "websocket listener bound");
        Ok(Self { listener })
    }

    /// Returns the local address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Waits for and upgrades the next incoming connection.
    pub async fn accept(&self) -> Result<WsConnection, TransportError> {
        let (stream, peer) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::Accept)?;

        let ws = tokio_tungstenite::accept_async(stream)
            .await
            .map_err(|e| TransportError::Handshake(e.to_string()))?;

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %peer, "accepted websocket connection");

        Ok(WsConnection { id, stream: ws })
    }
}

/// One accepted client connection, not yet split.
pub struct WsConnection {
    id: ConnectionId,
    stream: WsStream,
}

impl WsConnection {
    /// Returns the unique identifier for this connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Splits the connection into independent reader and writer halves.
    ///
    /// The reader belongs to the inbound event loop; the writer to the
    /// outbound pump. Keeping them separate means a blocked read never
    /// stalls outbound delivery.
    pub fn into_split(self) -> (WsReader, WsWriter) {
        let (sink, stream) = self.stream.split();
        (
            WsReader {
                id: self.id,
                stream,
            },
            WsWriter {
                id: self.id,
                sink,
            },
        )
    }
}

/// The receiving half of a connection.
pub struct WsReader {
    id: ConnectionId,
    stream: SplitStream<WsStream>,
}

impl WsReader {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Receives the next text payload from the peer.
    ///
    /// Binary frames are tolerated when they carry valid UTF-8 (some
    /// clients send JSON as binary). Ping/pong frames are skipped.
    /// Returns `Ok(None)` when the connection is cleanly closed.
    pub async fn recv(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(text.as_str().to_owned()));
                }
                Some(Ok(Message::Binary(data))) => {
                    return String::from_utf8(data.to_vec())
                        .map(Some)
                        .map_err(|_| TransportError::NonUtf8Frame);
                }
                Some(Ok(Message::Close(_))) | None => return Ok(None),
                Some(Ok(_)) => continue, // ping/pong/frame
                Some(Err(e)) => {
                    return Err(TransportError::Receive(e.to_string()));
                }
            }
        }
    }
}

/// The sending half of a connection.
pub struct WsWriter {
    id: ConnectionId,
    sink: SplitSink<WsStream, Message>,
}

impl WsWriter {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Sends a text frame to the peer.
    pub async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }

    /// Closes the connection.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        self.sink
            .close()
            .await
            .map_err(|e| TransportError::Send(e.to_string()))
    }
}
