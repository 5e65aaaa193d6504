//! Wire types: what participants send, and what the server sends back.
//!
//! All messages are internally tagged JSON objects with a kebab-case
//! `type` field, e.g. `{"type":"join-as-player"}` or
//! `{"type":"result","win":false}`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// A participant's request to the coordinator.
///
/// None of the intents carry a payload: who sent it is known from the
/// connection, and everything else is decided by the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Intent {
    /// Claim a player slot. Only legal while the game is in setup.
    JoinAsPlayer,
    /// Claim a watcher slot. Legal at any time.
    JoinAsWatcher,
    /// Start the countdown. Ignored unless the game is in setup.
    Start,
    /// Pull the trigger.
    Fire,
}

impl Intent {
    /// The wire name of this intent, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinAsPlayer => "join-as-player",
            Self::JoinAsWatcher => "join-as-watcher",
            Self::Start => "start",
            Self::Fire => "fire",
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// The phase names watchers see in `state-update` notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseName {
    Setup,
    Armed,
    Live,
    Finished,
}

impl fmt::Display for PhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Armed => "armed",
            Self::Live => "live",
            Self::Finished => "finished",
        })
    }
}

/// A message from the coordinator to one or more participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    /// Sent to a single player: did they win this round?
    Result { win: bool },
    /// Sent to watchers whenever the phase changes.
    StateUpdate { state: PhaseName },
}

impl Notification {
    /// A losing `result`.
    pub const LOSE: Self = Self::Result { win: false };
    /// A winning `result`.
    pub const WIN: Self = Self::Result { win: true };
}

/// An item on a participant's outbound channel.
///
/// The connection handler drains these in order: notifications are encoded
/// and written, `Close` makes the handler drop the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outbound {
    Notify(Notification),
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_json_uses_kebab_case_type_tag() {
        let json = serde_json::to_value(Intent::JoinAsWatcher).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "join-as-watcher" }));
    }

    #[test]
    fn test_intent_ignores_extra_fields() {
        // Clients may attach their own metadata; it is not an error.
        let intent: Intent =
            serde_json::from_str(r#"{"type":"fire","at":123}"#).unwrap();
        assert_eq!(intent, Intent::Fire);
    }

    #[test]
    fn test_intent_unknown_type_is_rejected() {
        let result: Result<Intent, _> =
            serde_json::from_str(r#"{"type":"reload"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_intent_name_matches_wire_tag() {
        for intent in [
            Intent::JoinAsPlayer,
            Intent::JoinAsWatcher,
            Intent::Start,
            Intent::Fire,
        ] {
            let json = serde_json::to_value(intent).unwrap();
            assert_eq!(json["type"], intent.name());
        }
    }

    #[test]
    fn test_result_notification_json_format() {
        let json = serde_json::to_value(Notification::WIN).unwrap();
        assert_eq!(json["type"], "result");
        assert_eq!(json["win"], true);

        let json = serde_json::to_value(Notification::LOSE).unwrap();
        assert_eq!(json["win"], false);
    }

    #[test]
    fn test_state_update_uses_lowercase_phase_names() {
        for (phase, name) in [
            (PhaseName::Setup, "setup"),
            (PhaseName::Armed, "armed"),
            (PhaseName::Live, "live"),
            (PhaseName::Finished, "finished"),
        ] {
            let json = serde_json::to_value(Notification::StateUpdate {
                state: phase,
            })
            .unwrap();
            assert_eq!(json["type"], "state-update");
            assert_eq!(json["state"], name);
            assert_eq!(phase.to_string(), name);
        }
    }
}
