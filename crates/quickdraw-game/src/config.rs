//! Duel configuration and the phase state machine.

use std::time::Duration;

use quickdraw_protocol::PhaseName;

// ---------------------------------------------------------------------------
// DuelConfig
// ---------------------------------------------------------------------------

/// Timing configuration for the duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelConfig {
    /// Shortest possible countdown (inclusive).
    pub countdown_min: Duration,

    /// Longest possible countdown (inclusive).
    pub countdown_max: Duration,

    /// How long a decided round stays `Finished` before the next setup.
    pub cooldown: Duration,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            countdown_min: Duration::from_millis(3000),
            countdown_max: Duration::from_millis(10_000),
            cooldown: Duration::from_millis(5000),
        }
    }
}

impl DuelConfig {
    /// Fixes out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`GameCoordinator::new`](crate::GameCoordinator::new).
    /// Inverted countdown bounds are swapped.
    pub fn validated(mut self) -> Self {
        if self.countdown_min > self.countdown_max {
            tracing::warn!(
                min_ms = self.countdown_min.as_millis() as u64,
                max_ms = self.countdown_max.as_millis() as u64,
                "countdown bounds inverted, swapping"
            );
            std::mem::swap(&mut self.countdown_min, &mut self.countdown_max);
        }
        self
    }
}

// ---------------------------------------------------------------------------
// GamePhase
// ---------------------------------------------------------------------------

/// The phase of the duel. Exactly one exists per coordinator.
///
/// Transitions are strictly ordered and cyclic:
///
/// ```text
/// Setup → Armed → Live → Finished → Setup → …
/// ```
///
/// - **Setup**: players may join; any participant may start.
/// - **Armed**: countdown running; firing is a foul.
/// - **Live**: countdown elapsed; the first accepted fire wins.
/// - **Finished**: a winner is declared; cool-down running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Setup,
    Armed,
    Live,
    Finished,
}

impl GamePhase {
    /// The only phase this one may move to.
    pub fn next(self) -> Self {
        match self {
            Self::Setup => Self::Armed,
            Self::Armed => Self::Live,
            Self::Live => Self::Finished,
            Self::Finished => Self::Setup,
        }
    }

    /// Returns `true` if `target` is the next phase in the cycle.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == target
    }

    /// Returns `true` if players may join in this phase.
    pub fn is_joinable(self) -> bool {
        matches!(self, Self::Setup)
    }

    /// The name watchers see in `state-update`.
    pub fn wire_name(self) -> PhaseName {
        match self {
            Self::Setup => PhaseName::Setup,
            Self::Armed => PhaseName::Armed,
            Self::Live => PhaseName::Live,
            Self::Finished => PhaseName::Finished,
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup => write!(f, "Setup"),
            Self::Armed => write!(f, "Armed"),
            Self::Live => write!(f, "Live"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}
