//! `RelayServer` builder and accept loop.
//!
//! Ties the layers together: transport accepts connections, the handler
//! decodes events, and the router/lifecycle modules move them through the
//! shared coordinator state.

use std::sync::Arc;

use scrawl_protocol::JsonCodec;
use scrawl_room::{ConnectionRegistry, GuessPolicy, RoomDirectory};
use scrawl_store::SessionStore;
use scrawl_transport::WsListener;
use tokio::sync::Mutex;

use crate::RelayError;
use crate::handler::handle_connection;

/// Registry and directory under one lock.
///
/// Membership lives in two structures (connection -> room in the
/// registry, room -> members in the directory); a single mutex keeps the
/// two views consistent and makes every mutation-plus-scope computation
/// atomic with respect to other handlers.
pub(crate) struct Coordinator {
    pub(crate) connections: ConnectionRegistry,
    pub(crate) rooms: RoomDirectory,
}

impl Coordinator {
    fn new() -> Self {
        Self {
            connections: ConnectionRegistry::new(),
            rooms: RoomDirectory::new(),
        }
    }
}

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<S: SessionStore, P: GuessPolicy> {
    pub(crate) coord: Mutex<Coordinator>,
    pub(crate) store: S,
    pub(crate) guess: P,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a relay server.
pub struct RelayServerBuilder {
    bind_addr: String,
}

impl RelayServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Binds the listener and builds the server with the given store and
    /// guess policy.
    pub async fn build<S: SessionStore, P: GuessPolicy>(
        self,
        store: S,
        guess: P,
    ) -> Result<RelayServer<S, P>, RelayError> {
        let listener = WsListener::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            coord: Mutex::new(Coordinator::new()),
            store,
            guess,
            codec: JsonCodec,
        });

        Ok(RelayServer { listener, state })
    }
}

impl Default for RelayServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running relay server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct RelayServer<S: SessionStore, P: GuessPolicy> {
    listener: WsListener,
    state: Arc<ServerState<S, P>>,
}

impl<S: SessionStore, P: GuessPolicy> RelayServer<S, P> {
    /// Creates a new builder.
    pub fn builder() -> RelayServerBuilder {
        RelayServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    /// Runs until the process is terminated.
    pub async fn run(self) -> Result<(), RelayError> {
        tracing::info!("scrawl relay running");

        loop {
            match self.listener.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
