//! # Quickdraw
//!
//! A real-time reaction duel served over WebSockets.
//!
//! Players join during setup, a watcher presses start, and after a random
//! countdown the first player to fire wins. Firing before the countdown
//! elapses loses the round on the spot.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quickdraw::prelude::*;
//!
//! # async fn run() -> Result<(), QuickdrawError> {
//! let server = QuickdrawServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .duel_config(DuelConfig::default())
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{CONFIG_PATH_ENV, ConfigError, PORT_ENV, ServerConfig};
pub use error::QuickdrawError;
pub use server::{QuickdrawServer, QuickdrawServerBuilder};

pub mod prelude {
    pub use crate::{
        ConfigError, QuickdrawError, QuickdrawServer, QuickdrawServerBuilder,
        ServerConfig,
    };
    pub use quickdraw_game::{
        CoordinatorHandle, DuelConfig, GameCoordinator, GamePhase, GameSnapshot,
    };
    pub use quickdraw_protocol::{
        Codec, Intent, JsonCodec, Notification, Outbound, ParticipantId,
        PhaseName,
    };
    pub use quickdraw_registry::{Group, Role};
    pub use quickdraw_timer::TimerKind;
}
