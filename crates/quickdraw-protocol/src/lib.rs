//! Wire protocol for Quickdraw.
//!
//! This crate defines what participants and the server say to each other:
//!
//! - **Types** ([`Intent`], [`Notification`], [`PhaseName`]): the
//!   messages that travel on the wire.
//! - **Outbound** ([`Outbound`]): what the coordinator pushes into a
//!   participant's outbound channel: a notification, or an order to drop
//!   the connection.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how messages become bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (Intent) → Coordinator (game state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Intent, Notification, Outbound, PhaseName};

/// Participants are identified by the connection that carries them.
pub use quickdraw_transport::ConnectionId as ParticipantId;
