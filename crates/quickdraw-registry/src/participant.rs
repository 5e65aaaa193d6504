//! Participant records: who a connection is, and what it has claimed.

use std::fmt;

use quickdraw_protocol::{Outbound, ParticipantId};
use tokio::sync::mpsc;

/// Channel sender for delivering outbound items to one connection.
///
/// Unbounded so that fan-out never waits on a slow client; a connection
/// that stops reading only grows its own queue.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// What a participant has claimed to be.
///
/// ```text
///               ┌── join-as-player ──→ Player
/// Unassigned ───┤
///               └── join-as-watcher ─→ Watcher
/// ```
///
/// There are no other edges: once a role is claimed it is kept until the
/// connection goes away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Unassigned,
    Player,
    Watcher,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unassigned => "unassigned",
            Self::Player => "player",
            Self::Watcher => "watcher",
        })
    }
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A named broadcast group. Membership in a group is what a role means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Players,
    Watchers,
}

impl Group {
    /// Every group, in a fixed order.
    pub const ALL: [Group; 2] = [Group::Players, Group::Watchers];

    /// The role a participant holds while in this group.
    pub fn role(self) -> Role {
        match self {
            Self::Players => Role::Player,
            Self::Watchers => Role::Watcher,
        }
    }

    /// The group's name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Players => "players",
            Self::Watchers => "watchers",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Participant
// ---------------------------------------------------------------------------

/// One connected participant.
///
/// Created on connect with [`Role::Unassigned`], destroyed on disconnect.
/// Owned by the [`ParticipantRegistry`](crate::ParticipantRegistry).
#[derive(Debug, Clone)]
pub struct Participant {
    /// The connection this participant arrived on.
    pub id: ParticipantId,

    /// The role claimed by the first successful join.
    pub role: Role,

    pub(crate) sender: OutboundSender,
}

impl Participant {
    pub(crate) fn new(id: ParticipantId, sender: OutboundSender) -> Self {
        Self {
            id,
            role: Role::Unassigned,
            sender,
        }
    }

    /// Queues an outbound item. Returns `false` if the connection's
    /// receiver is gone, which is an expected disconnect race.
    pub(crate) fn push(&self, item: Outbound) -> bool {
        self.sender.send(item).is_ok()
    }
}
