//! The reaction duel for Quickdraw.
//!
//! Players wait through a random countdown; the first to fire after it
//! elapses wins, and anyone who fires before it elapses is out for the
//! round. Watchers start rounds and follow the phase.
//!
//! # Key types
//!
//! - [`GameCoordinator`]: the state machine, synchronous and single-owner
//! - [`CoordinatorHandle`]: talks to a coordinator running as an actor
//! - [`GamePhase`]: `Setup → Armed → Live → Finished → Setup`
//! - [`FoulRegistry`]: who fired too early this round
//! - [`DuelConfig`]: countdown range and cool-down

mod actor;
mod config;
mod coordinator;
mod error;
mod fouls;

pub use actor::{CoordinatorHandle, spawn_coordinator};
pub use config::{DuelConfig, GamePhase};
pub use coordinator::{GameCoordinator, GameSnapshot};
pub use error::GameError;
pub use fouls::FoulRegistry;
