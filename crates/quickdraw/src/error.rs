//! Unified error type for the Quickdraw server.

use quickdraw_game::GameError;
use quickdraw_protocol::ProtocolError;
use quickdraw_registry::RegistryError;
use quickdraw_transport::TransportError;

use crate::ConfigError;

/// Top-level error that wraps every crate-specific error, so `?` works
/// across layer boundaries.
#[derive(Debug, thiserror::Error)]
pub enum QuickdrawError {
    /// Connection, send, or receive failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encode or decode failure.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The coordinator is gone or refused a registration.
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
