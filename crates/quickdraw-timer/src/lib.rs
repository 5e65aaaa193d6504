//! Round timers for Quickdraw.
//!
//! A duel has exactly two deferred actions: the randomized countdown that
//! turns `Armed` into `Live`, and the fixed cool-down that turns `Finished`
//! back into `Setup`. Never both at once. [`RoundTimer`] holds at most one
//! of them, tags it with the round it belongs to, and can be cancelled.
//!
//! # Idle mode
//!
//! With nothing scheduled, [`RoundTimer::wait`] pends forever. This is the
//! correct behavior inside the coordinator's `tokio::select!` loop, where
//! intents keep being processed while no timer is due.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle intents */ }
//!         expiry = timer.wait() => { /* apply if expiry.round is current */ }
//!     }
//! }
//! ```
//!
//! `wait` is cancel-safe: if the other branch wins, the pending timer stays
//! scheduled and the next call sleeps until the same deadline.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Timer identity
// ---------------------------------------------------------------------------

/// Which transition a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Armed → Live, after a randomized delay.
    Countdown,
    /// Finished → Setup, after the fixed cool-down.
    Cooldown,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Countdown => "countdown",
            Self::Cooldown => "cooldown",
        })
    }
}

/// What [`RoundTimer::wait`] returns when a timer comes due.
///
/// The receiver must check `round` (and `kind`) against its own state
/// before acting: an expiry is only meaningful for the round it was
/// scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerExpiry {
    pub kind: TimerKind,
    pub round: u64,
}

/// A scheduled, not yet expired timer.
#[derive(Debug, Clone)]
pub struct PendingTimer {
    kind: TimerKind,
    round: u64,
    delay: Duration,
    deadline: Instant,
}

impl PendingTimer {
    /// Which transition this timer drives.
    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    /// The round it was scheduled in.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// The delay it was scheduled with.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// When it comes due.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// The expiry this timer will report.
    pub fn expiry(&self) -> TimerExpiry {
        TimerExpiry {
            kind: self.kind,
            round: self.round,
        }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Lifetime counters for a [`RoundTimer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerStats {
    /// Timers scheduled.
    pub scheduled: u64,
    /// Timers that came due and were returned by `wait`.
    pub expired: u64,
    /// Timers removed by `cancel` before coming due.
    pub cancelled: u64,
    /// Timers overwritten by a `schedule` while still pending.
    pub replaced: u64,
}

// ---------------------------------------------------------------------------
// RoundTimer
// ---------------------------------------------------------------------------

/// Holds the single pending deferred action of the duel.
#[derive(Debug, Default)]
pub struct RoundTimer {
    pending: Option<PendingTimer>,
    stats: TimerStats,
}

impl RoundTimer {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `kind` for `round`, due `delay` from now.
    ///
    /// At most one timer exists. Scheduling over a pending timer replaces
    /// it; the coordinator never does this, so it is logged as a warning.
    pub fn schedule(&mut self, kind: TimerKind, round: u64, delay: Duration) {
        if let Some(old) = self.pending.take() {
            warn!(
                old_kind = %old.kind,
                old_round = old.round,
                new_kind = %kind,
                new_round = round,
                "replacing a pending timer"
            );
            self.stats.replaced += 1;
        }

        self.pending = Some(PendingTimer {
            kind,
            round,
            delay,
            deadline: Instant::now() + delay,
        });
        self.stats.scheduled += 1;

        debug!(
            %kind,
            round,
            delay_ms = delay.as_millis() as u64,
            "timer scheduled"
        );
    }

    /// Cancels the pending timer, if any, and returns what it would have
    /// reported. Safe to call when idle.
    pub fn cancel(&mut self) -> Option<TimerExpiry> {
        let cancelled = self.pending.take()?;
        self.stats.cancelled += 1;
        debug!(
            kind = %cancelled.kind,
            round = cancelled.round,
            "timer cancelled"
        );
        Some(cancelled.expiry())
    }

    /// Waits until the pending timer is due and returns its expiry.
    ///
    /// With nothing scheduled this future never resolves.
    pub async fn wait(&mut self) -> TimerExpiry {
        let Some(deadline) = self.pending.as_ref().map(|p| p.deadline) else {
            std::future::pending::<()>().await;
            unreachable!()
        };

        time::sleep_until(deadline).await;

        // No await between the sleep and the take: dropping this future
        // at any suspension point leaves the timer scheduled.
        match self.pending.take() {
            Some(fired) => {
                self.stats.expired += 1;
                trace!(kind = %fired.kind, round = fired.round, "timer expired");
                fired.expiry()
            }
            None => unreachable!("pending timer vanished while waiting"),
        }
    }

    /// The pending timer, if any.
    pub fn pending(&self) -> Option<&PendingTimer> {
        self.pending.as_ref()
    }

    /// Whether nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Lifetime counters.
    pub fn stats(&self) -> &TimerStats {
        &self.stats
    }
}

// ---------------------------------------------------------------------------
// Countdown draw
// ---------------------------------------------------------------------------

/// Draws a countdown uniformly from `[min, max]` at millisecond
/// granularity, both ends inclusive.
///
/// Inverted bounds are swapped rather than rejected.
pub fn draw_countdown<R: Rng + ?Sized>(
    rng: &mut R,
    min: Duration,
    max: Duration,
) -> Duration {
    let lo = millis(min.min(max));
    let hi = millis(min.max(max));
    Duration::from_millis(rng.random_range(lo..=hi))
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_draw_countdown_stays_within_inclusive_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let min = Duration::from_millis(3000);
        let max = Duration::from_millis(10_000);
        for _ in 0..10_000 {
            let d = draw_countdown(&mut rng, min, max);
            assert!(d >= min && d <= max, "{d:?} out of bounds");
        }
    }

    #[test]
    fn test_draw_countdown_degenerate_range_is_exact() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = Duration::from_millis(4200);
        assert_eq!(draw_countdown(&mut rng, d, d), d);
    }

    #[test]
    fn test_draw_countdown_reaches_both_ends() {
        // A three-value range is small enough that both ends show up.
        let mut rng = StdRng::seed_from_u64(99);
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(12);
        let draws: Vec<_> =
            (0..500).map(|_| draw_countdown(&mut rng, min, max)).collect();
        assert!(draws.contains(&min));
        assert!(draws.contains(&max));
    }

    #[test]
    fn test_draw_countdown_swaps_inverted_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let d = draw_countdown(
            &mut rng,
            Duration::from_millis(500),
            Duration::from_millis(100),
        );
        assert!(d >= Duration::from_millis(100));
        assert!(d <= Duration::from_millis(500));
    }

    #[test]
    fn test_timer_kind_display() {
        assert_eq!(TimerKind::Countdown.to_string(), "countdown");
        assert_eq!(TimerKind::Cooldown.to_string(), "cooldown");
    }
}
