//! Per-round record of players who fired too early.

use std::collections::HashSet;

use quickdraw_protocol::ParticipantId;

/// The set of players who fouled in the current round.
///
/// Owned by the coordinator. Filled while `Armed`, consulted while `Live`,
/// emptied in one step when the round is decided or abandoned.
#[derive(Debug, Default)]
pub struct FoulRegistry {
    fouled: HashSet<ParticipantId>,
}

impl FoulRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a foul. Returns `true` the first time `id` fouls this round.
    pub fn record(&mut self, id: ParticipantId) -> bool {
        self.fouled.insert(id)
    }

    /// Returns `true` if `id` fouled this round.
    pub fn contains(&self, id: ParticipantId) -> bool {
        self.fouled.contains(&id)
    }

    /// Forgets every foul.
    pub fn clear(&mut self) {
        self.fouled.clear();
    }

    pub fn len(&self) -> usize {
        self.fouled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fouled.is_empty()
    }
}
