//! Rules engine trait and the standard rule set.
//!
//! The turn engine drives play through `RulesEngine`:
//! - What actions are legal
//! - How actions modify state
//! - Whether the board at the end of a turn stands
//! - Win and draw conditions

use crate::core::action::Action;
use crate::core::player::PlayerId;
use crate::core::state::GameState;

use super::applier;
use super::generator;
use super::validity::{self, BoardRejection};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// A player emptied their rack.
    Winner(PlayerId),
    /// The pouch ran dry and nobody could commit.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Draw => false,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: order must be deterministic, the shell picks by index
/// - `apply_action`: never fails; stale actions are ignored
/// - `board_verdict`: pure, called once per turn
/// - `is_terminal`: return `None` if the game continues
pub trait RulesEngine {
    /// Ordered legal actions for `player`.
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action>;

    /// Apply an action to the game state.
    fn apply_action(&self, state: &mut GameState, player: PlayerId, action: &Action);

    /// Validate the board as it stands at the end of `player`'s turn.
    ///
    /// On success returns the points the player added this turn.
    fn board_verdict(&self, state: &GameState, player: PlayerId) -> Result<u32, BoardRejection>;

    /// Lock the board in after a successful verdict.
    fn fix(&self, state: &mut GameState);

    /// Check if the game is over.
    ///
    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// True if the board stands for `player`.
    fn check_board(&self, state: &GameState, player: PlayerId) -> bool {
        self.board_verdict(state, player).is_ok()
    }
}

/// Standard rules: runs and groups of three or more, jokers, and an
/// initial-meld threshold taken from the game config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn legal_actions(&self, state: &GameState, player: PlayerId) -> Vec<Action> {
        generator::legal_actions(&state.board, state.player(player), state.catalog())
    }

    fn apply_action(&self, state: &mut GameState, player: PlayerId, action: &Action) {
        applier::apply_action(state, player, action);
    }

    fn board_verdict(&self, state: &GameState, player: PlayerId) -> Result<u32, BoardRejection> {
        validity::board_verdict(
            &state.board,
            state.catalog(),
            state.player(player).in_quarantine,
            state.config().initial_meld_threshold,
        )
    }

    fn check_board(&self, state: &GameState, player: PlayerId) -> bool {
        validity::check_board(
            &state.board,
            state.catalog(),
            state.player(player),
            state.config().initial_meld_threshold,
        )
    }

    fn fix(&self, state: &mut GameState) {
        let (board, locations, catalog) = state.board_parts_mut();
        validity::fix(board, catalog, locations);
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if let Some((player, _)) = state.players.iter().find(|(_, p)| p.rack.is_empty()) {
            return Some(GameResult::Winner(player));
        }

        // A full round of idle turns with nothing left to draw
        if state.pouch.is_empty() && state.idle_turns as usize >= state.player_count() {
            return Some(GameResult::Draw);
        }

        None
    }
}
