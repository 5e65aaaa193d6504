//! Participant registry and broadcaster for Quickdraw.
//!
//! This crate tracks everyone connected to the duel:
//!
//! 1. **Participants**: one record per connection, with the [`Role`] it
//!    claimed ([`Participant`]).
//! 2. **Groups**: the `players` and `watchers` sets ([`Group`]).
//! 3. **Fan-out**: delivering notifications to one participant or to a
//!    point-in-time snapshot of a group ([`ParticipantRegistry`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Coordinator (above)  ← decides what to say and to whom
//!     ↕
//! Registry (this crate)  ← knows who is connected and in which group
//!     ↕
//! Protocol (below)  ← provides ParticipantId, Notification, Outbound
//! ```

mod error;
mod participant;
mod registry;

pub use error::RegistryError;
pub use participant::{Group, OutboundSender, Participant, Role};
pub use registry::ParticipantRegistry;
