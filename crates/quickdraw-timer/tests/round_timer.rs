//! Integration tests for the round timer.
//!
//! Uses `start_paused = true` so Tokio's clock only moves when every task
//! is idle, which makes deadlines exact.

use std::time::Duration;

use quickdraw_timer::{RoundTimer, TimerExpiry, TimerKind};
use tokio::time::Instant;

// =========================================================================
// Idle behavior
// =========================================================================

#[test]
fn test_new_timer_is_idle() {
    let t = RoundTimer::new();
    assert!(t.is_idle());
    assert!(t.pending().is_none());
    assert_eq!(t.stats().scheduled, 0);
}

#[tokio::test(start_paused = true)]
async fn test_idle_timer_never_fires() {
    let mut t = RoundTimer::new();

    let result =
        tokio::time::timeout(Duration::from_secs(60), t.wait()).await;
    assert!(result.is_err(), "idle timer should pend forever");
}

// =========================================================================
// Scheduling and expiry
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_wait_returns_expiry_at_deadline() {
    let mut t = RoundTimer::new();
    let start = Instant::now();
    t.schedule(TimerKind::Countdown, 3, Duration::from_millis(4500));

    let expiry = t.wait().await;

    assert_eq!(
        expiry,
        TimerExpiry {
            kind: TimerKind::Countdown,
            round: 3
        }
    );
    assert_eq!(start.elapsed(), Duration::from_millis(4500));
    assert!(t.is_idle(), "an expired timer is consumed");
    assert_eq!(t.stats().expired, 1);
}

#[tokio::test(start_paused = true)]
async fn test_pending_exposes_schedule_details() {
    let mut t = RoundTimer::new();
    t.schedule(TimerKind::Cooldown, 1, Duration::from_secs(5));

    let pending = t.pending().expect("scheduled");
    assert_eq!(pending.kind(), TimerKind::Cooldown);
    assert_eq!(pending.round(), 1);
    assert_eq!(pending.delay(), Duration::from_secs(5));
    assert_eq!(pending.deadline(), Instant::now() + Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_wait_is_cancel_safe() {
    let mut t = RoundTimer::new();
    let start = Instant::now();
    t.schedule(TimerKind::Countdown, 1, Duration::from_secs(2));

    // Drop the wait future before the deadline, as a losing select! branch.
    let early = tokio::time::timeout(Duration::from_secs(1), t.wait()).await;
    assert!(early.is_err());
    assert!(!t.is_idle(), "timer must survive a dropped wait");

    let expiry = t.wait().await;
    assert_eq!(expiry.kind, TimerKind::Countdown);
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

// =========================================================================
// Cancellation and replacement
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_cancel_prevents_expiry() {
    let mut t = RoundTimer::new();
    t.schedule(TimerKind::Countdown, 4, Duration::from_millis(100));

    let cancelled = t.cancel();

    assert_eq!(
        cancelled,
        Some(TimerExpiry {
            kind: TimerKind::Countdown,
            round: 4
        })
    );
    let result = tokio::time::timeout(Duration::from_secs(10), t.wait()).await;
    assert!(result.is_err(), "cancelled timer must not fire");
    assert_eq!(t.stats().cancelled, 1);
}

#[test]
fn test_cancel_when_idle_is_noop() {
    let mut t = RoundTimer::new();
    assert_eq!(t.cancel(), None);
    assert_eq!(t.stats().cancelled, 0);
}

#[tokio::test(start_paused = true)]
async fn test_schedule_replaces_pending_timer() {
    let mut t = RoundTimer::new();
    t.schedule(TimerKind::Countdown, 1, Duration::from_secs(9));
    t.schedule(TimerKind::Cooldown, 1, Duration::from_secs(1));

    let expiry = t.wait().await;

    assert_eq!(expiry.kind, TimerKind::Cooldown);
    assert_eq!(t.stats().replaced, 1);
    let again = tokio::time::timeout(Duration::from_secs(30), t.wait()).await;
    assert!(again.is_err(), "the replaced timer is gone");
}
