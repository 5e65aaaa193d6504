//! The game coordinator: the one owner of the duel's shared state.
//!
//! Every intent, connect, disconnect, and timer expiry ends up as a call on
//! [`GameCoordinator`]. The coordinator is synchronous and single-owner;
//! [`spawn_coordinator`](crate::spawn_coordinator) wraps it in an actor so
//! all of those calls are serialized through one task.
//!
//! # Race resolution
//!
//! The first `fire` *processed* while `Live` wins, because accepting it
//! moves the phase to `Finished` and that can only happen once per round.
//! Which of two near-simultaneous fires is processed first depends on the
//! order the transport delivered them, not on when the clients pressed
//! the button. The coordinator cannot see client-side reaction times, so
//! this is the fairness it offers.

use quickdraw_protocol::{Intent, Notification, ParticipantId};
use quickdraw_registry::{
    Group, OutboundSender, ParticipantRegistry, RegistryError, Role,
};
use quickdraw_timer::{RoundTimer, TimerExpiry, TimerKind, draw_countdown};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{DuelConfig, FoulRegistry, GamePhase};

/// A point-in-time summary of the coordinator, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    /// Number of rounds started so far (0 before the first `start`).
    pub round: u64,
    pub players: usize,
    pub watchers: usize,
    pub fouls: usize,
    /// The timer currently pending, if any.
    pub timer: Option<TimerKind>,
}

/// The duel state machine.
pub struct GameCoordinator {
    phase: GamePhase,
    /// Incremented on every `Setup → Armed`. Timers carry the round they
    /// were scheduled in, so an expiry from an older round is recognizable.
    round: u64,
    /// The last round a winner was declared in.
    decided_round: Option<u64>,
    fouls: FoulRegistry,
    timer: RoundTimer,
    registry: ParticipantRegistry,
    config: DuelConfig,
    rng: StdRng,
}

impl GameCoordinator {
    /// Creates a coordinator in `Setup` with an OS-seeded RNG.
    pub fn new(config: DuelConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Creates a coordinator with a caller-supplied RNG, so countdown
    /// draws can be reproduced.
    pub fn with_rng(config: DuelConfig, rng: StdRng) -> Self {
        Self {
            phase: GamePhase::Setup,
            round: 0,
            decided_round: None,
            fouls: FoulRegistry::new(),
            timer: RoundTimer::new(),
            registry: ParticipantRegistry::new(),
            config: config.validated(),
            rng,
        }
    }

    // -- Connection lifecycle ---------------------------------------------

    /// Registers a new connection as an unassigned participant.
    pub fn connect(
        &mut self,
        id: ParticipantId,
        sender: OutboundSender,
    ) -> Result<(), RegistryError> {
        self.registry.register(id, sender)
    }

    /// Drops a participant from whichever group held it.
    ///
    /// Nothing else changes: in-flight timers keep running, and a foul the
    /// participant already committed stays recorded for the round.
    pub fn on_disconnect(&mut self, id: ParticipantId) {
        if let Some(gone) = self.registry.unregister(id) {
            tracing::info!(
                participant = %id,
                role = %gone.role,
                phase = %self.phase,
                "participant disconnected"
            );
        }
    }

    // -- Intents ----------------------------------------------------------

    /// Dispatches a decoded intent from `caller`.
    pub fn handle_intent(&mut self, caller: ParticipantId, intent: Intent) {
        tracing::trace!(participant = %caller, intent = intent.name(), "intent");
        match intent {
            Intent::JoinAsPlayer => self.request_join_as_player(caller),
            Intent::JoinAsWatcher => self.request_join_as_watcher(caller),
            Intent::Start => self.request_start(caller),
            Intent::Fire => self.request_fire(caller),
        }
    }

    /// `Setup → Armed`, and schedules the countdown. Ignored in any other
    /// phase, so every watcher can press start without coordinating, and
    /// ignored from callers that are not (or no longer) registered.
    pub fn request_start(&mut self, caller: ParticipantId) {
        if self.registry.get(caller).is_none() {
            tracing::debug!(participant = %caller, "start from unknown participant");
            return;
        }
        if self.phase != GamePhase::Setup {
            tracing::debug!(
                participant = %caller,
                phase = %self.phase,
                "start ignored"
            );
            return;
        }

        self.round += 1;
        self.advance(GamePhase::Armed);

        let delay = draw_countdown(
            &mut self.rng,
            self.config.countdown_min,
            self.config.countdown_max,
        );
        self.timer.schedule(TimerKind::Countdown, self.round, delay);

        tracing::info!(
            participant = %caller,
            round = self.round,
            players = self.registry.group_len(Group::Players),
            "round started"
        );
    }

    /// Adds the caller to the players group while in `Setup`.
    ///
    /// Outside `Setup` the caller's connection is terminated, whatever role
    /// it holds. Inside `Setup` a repeat join from a player is a no-op and
    /// a watcher keeps its first claim.
    pub fn request_join_as_player(&mut self, caller: ParticipantId) {
        let Some(role) = self.registry.role(caller) else {
            tracing::debug!(participant = %caller, "join from unknown participant");
            return;
        };

        if !self.phase.is_joinable() {
            tracing::warn!(
                participant = %caller,
                %role,
                phase = %self.phase,
                "late player join, terminating connection"
            );
            self.registry.terminate(caller);
            return;
        }

        match role {
            Role::Player => {
                tracing::debug!(participant = %caller, "already a player");
            }
            Role::Watcher => {
                tracing::debug!(
                    participant = %caller,
                    "watcher asked to play, role is fixed"
                );
            }
            Role::Unassigned => {
                if let Err(e) = self.registry.add_to_group(caller, Group::Players) {
                    tracing::debug!(participant = %caller, error = %e, "player join failed");
                }
            }
        }
    }

    /// Adds the caller to the watchers group, in any phase, and sends it
    /// the current phase so it does not wait blind for the next change.
    pub fn request_join_as_watcher(&mut self, caller: ParticipantId) {
        match self.registry.add_to_group(caller, Group::Watchers) {
            Ok(true) => {
                self.registry.send_to_one(caller, self.phase_notification());
            }
            Ok(false) => {}
            Err(e) => {
                tracing::debug!(participant = %caller, error = %e, "watcher join failed");
            }
        }
    }

    /// Resolves a fire according to the current phase.
    ///
    /// | Phase      | Effect                                               |
    /// |------------|------------------------------------------------------|
    /// | `Setup`    | ignored                                              |
    /// | `Armed`    | foul: recorded, caller told it lost                  |
    /// | `Armed`    | repeat foul in the same round: silent                |
    /// | `Live`     | wins unless the caller fouled; decides the round     |
    /// | `Finished` | ignored                                              |
    ///
    /// Only players can fire. A foul is penalized once per round: the first
    /// early fire sends `lose`, repeats while still `Armed` send nothing.
    pub fn request_fire(&mut self, caller: ParticipantId) {
        if self.registry.role(caller) != Some(Role::Player) {
            tracing::debug!(participant = %caller, "fire from non-player ignored");
            return;
        }

        match self.phase {
            GamePhase::Setup | GamePhase::Finished => {
                tracing::debug!(
                    participant = %caller,
                    phase = %self.phase,
                    "fire ignored"
                );
            }
            GamePhase::Armed => {
                if self.fouls.record(caller) {
                    tracing::info!(
                        participant = %caller,
                        round = self.round,
                        "false start"
                    );
                    self.registry.send_to_one(caller, Notification::LOSE);
                }
            }
            GamePhase::Live => {
                if self.fouls.contains(caller) {
                    tracing::debug!(
                        participant = %caller,
                        round = self.round,
                        "fire from fouled player ignored"
                    );
                    return;
                }
                self.declare_winner(caller);
            }
        }
    }

    // -- Timers -----------------------------------------------------------

    /// Applies a timer expiry. Expiries from another round, or of a kind
    /// that does not match the current phase, are discarded.
    pub fn on_timer(&mut self, expiry: TimerExpiry) {
        if expiry.round != self.round {
            tracing::debug!(
                kind = %expiry.kind,
                timer_round = expiry.round,
                round = self.round,
                "stale timer discarded"
            );
            return;
        }

        match (expiry.kind, self.phase) {
            (TimerKind::Countdown, GamePhase::Armed) => {
                self.advance(GamePhase::Live);
                tracing::info!(round = self.round, "countdown elapsed, live");
            }
            (TimerKind::Cooldown, GamePhase::Finished) => {
                self.enter_setup();
            }
            (kind, phase) => {
                tracing::debug!(
                    %kind,
                    %phase,
                    round = self.round,
                    "timer does not match phase, discarded"
                );
            }
        }
    }

    /// Forces the game back to `Setup`, cancelling any pending timer.
    ///
    /// Returns `false` if the game was already in `Setup`.
    pub fn reset(&mut self) -> bool {
        if self.phase == GamePhase::Setup {
            return false;
        }
        tracing::warn!(
            phase = %self.phase,
            round = self.round,
            "forcing return to setup"
        );
        self.enter_setup();
        true
    }

    // -- Accessors --------------------------------------------------------

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn registry(&self) -> &ParticipantRegistry {
        &self.registry
    }

    pub fn fouls(&self) -> &FoulRegistry {
        &self.fouls
    }

    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    /// Mutable access for the actor loop, which awaits `wait()`.
    pub(crate) fn timer_mut(&mut self) -> &mut RoundTimer {
        &mut self.timer
    }

    /// Whether `id` fouled in the current round.
    pub fn is_fouled(&self, id: ParticipantId) -> bool {
        self.fouls.contains(id)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round: self.round,
            players: self.registry.group_len(Group::Players),
            watchers: self.registry.group_len(Group::Watchers),
            fouls: self.fouls.len(),
            timer: self.timer.pending().map(|p| p.kind()),
        }
    }

    // -- Internals --------------------------------------------------------

    fn declare_winner(&mut self, winner: ParticipantId) {
        assert_ne!(
            self.decided_round,
            Some(self.round),
            "round {} decided twice",
            self.round
        );
        self.decided_round = Some(self.round);
        self.advance(GamePhase::Finished);
        self.fouls.clear();

        let losers = self.registry.send_to_group_except(
            Group::Players,
            winner,
            Notification::LOSE,
        );
        self.registry.send_to_one(winner, Notification::WIN);
        self.timer
            .schedule(TimerKind::Cooldown, self.round, self.config.cooldown);

        tracing::info!(
            participant = %winner,
            round = self.round,
            losers,
            "winner declared"
        );
    }

    /// Enters `Setup` from any phase: no timer survives, no foul survives.
    fn enter_setup(&mut self) {
        self.timer.cancel();
        self.fouls.clear();
        if self.phase.can_transition_to(GamePhase::Setup) {
            self.advance(GamePhase::Setup);
        } else {
            self.phase = GamePhase::Setup;
            self.broadcast_phase();
        }
        tracing::info!(round = self.round, "ready for next round");
    }

    /// Moves one step along the cycle and tells the watchers.
    fn advance(&mut self, to: GamePhase) {
        assert!(
            self.phase.can_transition_to(to),
            "illegal phase transition {} -> {}",
            self.phase,
            to
        );
        self.phase = to;
        self.broadcast_phase();
    }

    fn broadcast_phase(&self) {
        self.registry
            .send_to_group(Group::Watchers, self.phase_notification());
    }

    fn phase_notification(&self) -> Notification {
        Notification::StateUpdate {
            state: self.phase.wire_name(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
