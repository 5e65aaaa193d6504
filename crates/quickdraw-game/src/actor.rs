//! Coordinator actor: a Tokio task that owns the [`GameCoordinator`].
//!
//! Connection handlers never touch the coordinator directly. They hold a
//! [`CoordinatorHandle`] and send commands over a channel; the actor
//! applies them one at a time, interleaved with timer expiries. That
//! single queue is what makes "first fire wins" well defined.

use quickdraw_protocol::{Intent, ParticipantId};
use quickdraw_registry::OutboundSender;
use tokio::sync::{mpsc, oneshot};

use crate::{GameCoordinator, GameError, GameSnapshot};

/// Commands sent to the coordinator actor through its channel.
pub(crate) enum CoordinatorCommand {
    /// Register a new connection.
    Connect {
        id: ParticipantId,
        sender: OutboundSender,
        reply: oneshot::Sender<Result<(), GameError>>,
    },

    /// Deliver a decoded intent.
    Intent {
        caller: ParticipantId,
        intent: Intent,
    },

    /// A connection went away.
    Disconnect { id: ParticipantId },

    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },

    /// Force the game back to setup.
    Reset { reply: oneshot::Sender<bool> },

    Shutdown,
}

/// Handle to the running coordinator actor.
///
/// Cheap to clone; every connection handler holds one.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorCommand>,
}

impl CoordinatorHandle {
    /// Registers a connection and its outbound channel. Resolves once the
    /// participant is known to the coordinator, so intents sent afterwards
    /// are never seen before the registration.
    pub async fn connect(
        &self,
        id: ParticipantId,
        sender: OutboundSender,
    ) -> Result<(), GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(CoordinatorCommand::Connect {
                id,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)?
    }

    /// Queues an intent (fire-and-forget).
    pub async fn submit(
        &self,
        caller: ParticipantId,
        intent: Intent,
    ) -> Result<(), GameError> {
        self.sender
            .send(CoordinatorCommand::Intent { caller, intent })
            .await
            .map_err(|_| GameError::Unavailable)
    }

    /// Reports a closed connection.
    pub async fn disconnect(&self, id: ParticipantId) -> Result<(), GameError> {
        self.sender
            .send(CoordinatorCommand::Disconnect { id })
            .await
            .map_err(|_| GameError::Unavailable)
    }

    /// Reads the coordinator's current state.
    pub async fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(CoordinatorCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)
    }

    /// Forces the game back to setup. Returns `false` if it already was.
    pub async fn reset(&self) -> Result<bool, GameError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(CoordinatorCommand::Reset { reply: reply_tx })
            .await
            .map_err(|_| GameError::Unavailable)?;
        reply_rx.await.map_err(|_| GameError::Unavailable)
    }

    /// Stops the actor. Commands queued before this one are still applied.
    pub async fn shutdown(&self) -> Result<(), GameError> {
        self.sender
            .send(CoordinatorCommand::Shutdown)
            .await
            .map_err(|_| GameError::Unavailable)
    }

    /// Completes once the actor has stopped.
    pub async fn closed(&self) {
        self.sender.closed().await
    }
}

struct CoordinatorActor {
    coordinator: GameCoordinator,
    receiver: mpsc::Receiver<CoordinatorCommand>,
}

impl CoordinatorActor {
    async fn run(mut self) {
        tracing::info!(
            countdown_min_ms = self.coordinator.config().countdown_min.as_millis() as u64,
            countdown_max_ms = self.coordinator.config().countdown_max.as_millis() as u64,
            cooldown_ms = self.coordinator.config().cooldown.as_millis() as u64,
            "coordinator started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(CoordinatorCommand::Shutdown) | None => break,
                        Some(cmd) => self.handle(cmd),
                    }
                }
                expiry = self.coordinator.timer_mut().wait() => {
                    self.coordinator.on_timer(expiry);
                }
            }
        }

        tracing::info!(round = self.coordinator.round(), "coordinator stopped");
    }

    fn handle(&mut self, cmd: CoordinatorCommand) {
        match cmd {
            CoordinatorCommand::Connect { id, sender, reply } => {
                let result = self
                    .coordinator
                    .connect(id, sender)
                    .map_err(GameError::from);
                let _ = reply.send(result);
            }
            CoordinatorCommand::Intent { caller, intent } => {
                self.coordinator.handle_intent(caller, intent);
            }
            CoordinatorCommand::Disconnect { id } => {
                self.coordinator.on_disconnect(id);
            }
            CoordinatorCommand::Snapshot { reply } => {
                let _ = reply.send(self.coordinator.snapshot());
            }
            CoordinatorCommand::Reset { reply } => {
                let _ = reply.send(self.coordinator.reset());
            }
            CoordinatorCommand::Shutdown => {}
        }
    }
}

/// Spawns the coordinator actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; senders wait when it is full.
pub fn spawn_coordinator(
    coordinator: GameCoordinator,
    channel_size: usize,
) -> CoordinatorHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = CoordinatorActor {
        coordinator,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    CoordinatorHandle { sender: tx }
}
