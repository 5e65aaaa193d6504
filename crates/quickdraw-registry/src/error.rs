//! Error types for the registry layer.

use quickdraw_protocol::ParticipantId;

use crate::Role;

/// Errors that can occur while changing registry membership.
///
/// The coordinator treats all of these as benign races: they are logged
/// and the offending intent is dropped.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No participant is registered under this id. Usually the connection
    /// went away between sending an intent and the intent being processed.
    #[error("participant {0} not found")]
    NotFound(ParticipantId),

    /// A participant with this id is already registered.
    #[error("participant {0} is already registered")]
    AlreadyRegistered(ParticipantId),

    /// The participant already claimed a different role, and roles are
    /// fixed for the lifetime of a connection.
    #[error("participant {id} already holds role {held}")]
    RoleConflict { id: ParticipantId, held: Role },
}
