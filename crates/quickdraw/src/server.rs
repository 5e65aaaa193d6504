//! `QuickdrawServer` builder and accept loop.
//!
//! Ties the layers together: transport → protocol → coordinator actor.

use std::sync::Arc;

use quickdraw_game::{CoordinatorHandle, DuelConfig, GameCoordinator, spawn_coordinator};
use quickdraw_protocol::{Codec, JsonCodec};
use quickdraw_transport::{Transport, WebSocketTransport};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::handler::handle_connection;
use crate::{QuickdrawError, ServerConfig};

/// Default capacity of the coordinator's command queue.
const DEFAULT_COMMAND_BUFFER: usize = 1024;

/// Shared state handed to each connection task.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) coordinator: CoordinatorHandle,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Quickdraw server.
///
/// ```rust,ignore
/// let server = QuickdrawServer::builder()
///     .bind("0.0.0.0:8080")
///     .duel_config(DuelConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct QuickdrawServerBuilder {
    bind_addr: String,
    duel: DuelConfig,
    seed: Option<u64>,
    command_buffer: usize,
}

impl QuickdrawServerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: ServerConfig::default().listen_addr(),
            duel: DuelConfig::default(),
            seed: None,
            command_buffer: DEFAULT_COMMAND_BUFFER,
        }
    }

    /// Sets the address to bind to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets countdown and cool-down timings.
    pub fn duel_config(mut self, duel: DuelConfig) -> Self {
        self.duel = duel;
        self
    }

    /// Takes the bind address and timings from a loaded [`ServerConfig`].
    pub fn config(self, config: &ServerConfig) -> Self {
        self.bind(&config.listen_addr()).duel_config(config.duel())
    }

    /// Seeds the countdown RNG, making countdown lengths reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the coordinator's command queue capacity.
    pub fn command_buffer(mut self, size: usize) -> Self {
        self.command_buffer = size.max(1);
        self
    }

    /// Binds the listener and starts the coordinator actor.
    pub async fn build(self) -> Result<QuickdrawServer, QuickdrawError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let coordinator = match self.seed {
            Some(seed) => GameCoordinator::with_rng(self.duel, StdRng::seed_from_u64(seed)),
            None => GameCoordinator::new(self.duel),
        };
        let coordinator = spawn_coordinator(coordinator, self.command_buffer);

        let state = Arc::new(ServerState {
            coordinator,
            codec: JsonCodec,
        });

        Ok(QuickdrawServer { transport, state })
    }
}

impl Default for QuickdrawServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Quickdraw server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct QuickdrawServer<C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
}

impl QuickdrawServer {
    pub fn builder() -> QuickdrawServerBuilder {
        QuickdrawServerBuilder::new()
    }
}

impl<C: Codec> QuickdrawServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// A handle to the coordinator, for snapshots, resets, and shutdown.
    pub fn coordinator(&self) -> CoordinatorHandle {
        self.state.coordinator.clone()
    }

    /// Runs the accept loop, spawning a handler task per connection.
    ///
    /// Returns as soon as the coordinator stops, even while waiting for a
    /// connection. Accept errors are logged and the loop continues.
    pub async fn run(mut self) -> Result<(), QuickdrawError> {
        tracing::info!("quickdraw server running");

        loop {
            let accepted = tokio::select! {
                () = self.state.coordinator.closed() => {
                    tracing::info!("coordinator stopped, leaving accept loop");
                    return Ok(());
                }
                accepted = self.transport.accept() => accepted,
            };

            match accepted {
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
