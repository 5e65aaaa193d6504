//! The participant registry: membership plus fan-out.
//!
//! # Concurrency note
//!
//! `ParticipantRegistry` is NOT thread-safe by itself. It is owned by the
//! coordinator actor and only ever touched from that one task, which is
//! what makes "snapshot of a group at broadcast time" well defined.

use std::collections::{HashMap, HashSet};

use quickdraw_protocol::{Notification, Outbound, ParticipantId};

use crate::{Group, OutboundSender, Participant, RegistryError, Role};

/// Tracks every connected participant and the groups they belong to.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ add_to_group() ──→ unregister() | terminate()
///     │                │                       │
///     ▼                ▼                       ▼
/// [Unassigned]   [Player|Watcher]           (gone)
/// ```
pub struct ParticipantRegistry {
    /// Every connected participant, keyed by connection.
    participants: HashMap<ParticipantId, Participant>,

    /// Group membership. Kept in sync with each participant's `role`.
    groups: HashMap<Group, HashSet<ParticipantId>>,
}

impl ParticipantRegistry {
    /// Creates an empty registry with both groups present and empty.
    pub fn new() -> Self {
        Self {
            participants: HashMap::new(),
            groups: Group::ALL
                .into_iter()
                .map(|g| (g, HashSet::new()))
                .collect(),
        }
    }

    /// Records a new connection with role [`Role::Unassigned`].
    ///
    /// # Errors
    /// [`RegistryError::AlreadyRegistered`] if the id is already known.
    pub fn register(
        &mut self,
        id: ParticipantId,
        sender: OutboundSender,
    ) -> Result<(), RegistryError> {
        if self.participants.contains_key(&id) {
            return Err(RegistryError::AlreadyRegistered(id));
        }
        self.participants.insert(id, Participant::new(id, sender));
        tracing::debug!(participant = %id, "participant registered");
        Ok(())
    }

    /// Forgets a participant entirely: group membership and outbound
    /// channel. Returns the removed record, if there was one.
    pub fn unregister(&mut self, id: ParticipantId) -> Option<Participant> {
        self.remove_from_all_groups(id);
        let removed = self.participants.remove(&id);
        if removed.is_some() {
            tracing::debug!(participant = %id, "participant unregistered");
        }
        removed
    }

    /// Adds a participant to a group, fixing its role on first success.
    ///
    /// Membership is a set: adding an existing member returns `Ok(false)`
    /// and changes nothing. Returns `Ok(true)` when the participant is
    /// newly added.
    ///
    /// # Errors
    /// - [`RegistryError::NotFound`]: unknown participant
    /// - [`RegistryError::RoleConflict`]: it already claimed the other role
    pub fn add_to_group(
        &mut self,
        id: ParticipantId,
        group: Group,
    ) -> Result<bool, RegistryError> {
        let participant = self
            .participants
            .get_mut(&id)
            .ok_or(RegistryError::NotFound(id))?;

        let wanted = group.role();
        match participant.role {
            Role::Unassigned => participant.role = wanted,
            held if held == wanted => {}
            held => return Err(RegistryError::RoleConflict { id, held }),
        }

        let added = self.groups.entry(group).or_default().insert(id);
        if added {
            tracing::info!(
                participant = %id,
                %group,
                members = self.group_len(group),
                "participant joined group"
            );
        }
        Ok(added)
    }

    /// Removes a participant from every group it belongs to.
    ///
    /// The participant record (and its role) survives; only
    /// [`unregister`](Self::unregister) destroys it. Returns `true` if any
    /// membership was removed.
    pub fn remove_from_all_groups(&mut self, id: ParticipantId) -> bool {
        let mut removed = false;
        for members in self.groups.values_mut() {
            removed |= members.remove(&id);
        }
        removed
    }

    /// Sends a notification to every member of `group` at call time.
    ///
    /// Members whose connection has already gone away are skipped
    /// silently. Returns how many members it was delivered to.
    pub fn send_to_group(
        &self,
        group: Group,
        notification: Notification,
    ) -> usize {
        self.fan_out(group, None, notification)
    }

    /// Like [`send_to_group`](Self::send_to_group), but skips `excluded`.
    pub fn send_to_group_except(
        &self,
        group: Group,
        excluded: ParticipantId,
        notification: Notification,
    ) -> usize {
        self.fan_out(group, Some(excluded), notification)
    }

    /// Sends a notification to one participant. Returns `false` if it is
    /// not registered or its connection is gone.
    pub fn send_to_one(
        &self,
        id: ParticipantId,
        notification: Notification,
    ) -> bool {
        self.push(id, Outbound::Notify(notification))
    }

    /// Asks the participant's connection handler to drop the connection
    /// and forgets the participant at once.
    ///
    /// Anything the connection already queued finds no participant and is
    /// ignored; the handler's later disconnect report finds nothing to
    /// remove. Returns the removed record.
    pub fn terminate(&mut self, id: ParticipantId) -> Option<Participant> {
        let removed = self.unregister(id)?;
        removed.push(Outbound::Close);
        tracing::debug!(participant = %id, role = %removed.role, "participant terminated");
        Some(removed)
    }

    /// Looks up a participant.
    pub fn get(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id)
    }

    /// The role a participant holds, if it is registered.
    pub fn role(&self, id: ParticipantId) -> Option<Role> {
        self.participants.get(&id).map(|p| p.role)
    }

    /// Returns `true` if `id` is currently a member of `group`.
    pub fn contains(&self, group: Group, id: ParticipantId) -> bool {
        self.groups.get(&group).is_some_and(|m| m.contains(&id))
    }

    /// A sorted snapshot of a group's members.
    pub fn members(&self, group: Group) -> Vec<ParticipantId> {
        let mut ids: Vec<_> = self
            .groups
            .get(&group)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Number of members in a group.
    pub fn group_len(&self, group: Group) -> usize {
        self.groups.get(&group).map_or(0, HashSet::len)
    }

    /// Number of registered participants (any role).
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    fn fan_out(
        &self,
        group: Group,
        excluded: Option<ParticipantId>,
        notification: Notification,
    ) -> usize {
        let Some(members) = self.groups.get(&group) else {
            return 0;
        };
        let item = Outbound::Notify(notification);
        let mut delivered = 0;
        for id in members {
            if Some(*id) == excluded {
                continue;
            }
            if self.push(*id, item) {
                delivered += 1;
            }
        }
        tracing::trace!(%group, ?notification, delivered, "broadcast");
        delivered
    }

    fn push(&self, id: ParticipantId, item: Outbound) -> bool {
        self.participants.get(&id).is_some_and(|p| p.push(item))
    }
}

impl Default for ParticipantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
