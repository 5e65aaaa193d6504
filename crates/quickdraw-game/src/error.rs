//! Error types for the game layer.

use quickdraw_registry::RegistryError;

/// Errors surfaced by [`CoordinatorHandle`](crate::CoordinatorHandle).
///
/// Game rules never produce errors: illegal intents are ignored inside
/// the coordinator. What remains is plumbing.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The coordinator actor has stopped and its channel is closed.
    #[error("coordinator is unavailable")]
    Unavailable,

    /// The registry refused a membership change.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
