//! Engine errors.
//!
//! These cover misuse of the engine API. Rule failures (an illegal meld, an
//! unmet initial-meld threshold) are not errors: the validity checker reports
//! them as data and the turn engine rolls the turn back.

use thiserror::Error;

use super::action::Action;
use super::entity::TileId;
use crate::turn::TurnPhase;

/// Errors returned by the engine API.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The action is not among the legal actions for the current state.
    #[error("illegal action {action:?} in current state")]
    IllegalAction { action: Action },

    /// The call is not valid in the current turn phase.
    #[error("expected turn phase {expected:?}, engine is in {actual:?}")]
    WrongPhase { expected: TurnPhase, actual: TurnPhase },

    /// The game configuration cannot produce a playable game.
    #[error("invalid config: {msg}")]
    InvalidConfig { msg: String },

    /// The pouch ran out while dealing racks.
    #[error("pouch exhausted while dealing: needed {needed}, had {available}")]
    PouchExhausted { needed: usize, available: usize },

    /// The game already has a result.
    #[error("game is over")]
    GameOver,

    /// A tile is held by zero or several containers.
    #[error("ownership violation for {tile}: {msg}")]
    OwnershipViolation { tile: TileId, msg: String },
}

/// Result alias for engine API calls.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::InvalidConfig { msg: "no colors".to_string() };
        assert_eq!(err.to_string(), "invalid config: no colors");

        let err = EngineError::OwnershipViolation {
            tile: TileId(3),
            msg: "found in 2 containers".to_string(),
        };
        assert_eq!(err.to_string(), "ownership violation for Tile(3): found in 2 containers");
    }

    #[test]
    fn test_illegal_action_message() {
        let err = EngineError::IllegalAction { action: Action::DrawTile };
        assert_eq!(err.to_string(), "illegal action DrawTile in current state");
    }
}
