//! Turn engine: one player's turn from snapshot to commit or rollback.
//!
//! ## Lifecycle
//!
//! ```text
//! TurnStart --begin_turn--> Acting --act/finish_turn--> TurnStart (next player)
//!                                                   \-> GameOver
//! ```
//!
//! `begin_turn` snapshots the board, the acting rack, the location table and
//! the history length. While `Acting`, each chosen action is checked against
//! the legal list and applied. The turn ends when the player draws or says
//! "done", and the board is checked once. Then exactly one of four things
//! happens:
//!
//! - `Drew`: the player drew and the board is legal; any board moves are
//!   fixed
//! - `Passed`: the board is legal but nothing came off the rack and nothing
//!   was drawn; board moves are undone and the player draws
//! - `Committed`: the board is legal; it is fixed and the player leaves
//!   quarantine
//! - `RolledBack`: the board is illegal; everything is restored and the
//!   player ends the turn one tile up
//!
//! A draw with the board untouched skips the check, so a quarantined player
//! may draw without meeting the threshold.
//!
//! The snapshot is three `im` clones, so taking one every turn is cheap.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::core::action::Action;
use crate::core::entity::TileId;
use crate::core::config::GameConfig;
use crate::core::error::{EngineError, EngineResult};
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::rules::{BoardRejection, GameResult, RulesEngine, StandardRules};
use crate::zones::{Board, Location, LocationTable, Rack};

use super::shell::{ActionSource, Choice, RackRenderer};

/// Where the engine is in the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for `begin_turn`.
    TurnStart,
    /// The active player is choosing actions.
    Acting,
    /// The game has a result; no more turns.
    GameOver,
}

/// How a turn ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The board was valid and the player's new melds are now permanent.
    Committed { points: u32 },
    /// The board was invalid; the turn was undone and one tile drawn.
    /// A draw that ended the turn counts as that tile.
    RolledBack { reason: BoardRejection },
    /// The player said "done" without playing from the rack. The board goes
    /// back to how the turn found it, even when rearranged legally, and one
    /// tile is drawn.
    Passed,
    /// The player chose to draw. Legal board moves made first are fixed.
    Drew,
}

impl TurnOutcome {
    #[must_use]
    pub const fn is_commit(&self) -> bool {
        matches!(self, TurnOutcome::Committed { .. })
    }
}

/// Pre-turn copy of everything a turn can change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnSnapshot {
    pub player: PlayerId,
    pub board: Board,
    pub rack: Rack,
    pub locations: LocationTable,
    /// Length of the action history when the turn started.
    pub history_len: usize,
}

impl TurnSnapshot {
    fn take(state: &GameState) -> Self {
        let player = state.active_player;
        Self {
            player,
            board: state.board.clone(),
            rack: state.player(player).rack.clone(),
            locations: state.locations.clone(),
            history_len: state.action_history.len(),
        }
    }
}

/// Runs turns against a `GameState` under a `RulesEngine`.
#[derive(Clone, Debug)]
pub struct TurnEngine<R = StandardRules> {
    rules: R,
    state: GameState,
    phase: TurnPhase,
    snapshot: Option<TurnSnapshot>,
    result: Option<GameResult>,
}

impl TurnEngine<StandardRules> {
    /// Deal a new game under the standard rules.
    pub fn standard(config: GameConfig, seed: u64) -> EngineResult<Self> {
        Ok(Self::new(GameState::new(config, seed)?, StandardRules))
    }
}

impl<R: RulesEngine> TurnEngine<R> {
    /// Wrap an existing state. Play starts with `state.active_player`.
    pub fn new(state: GameState, rules: R) -> Self {
        let result = rules.is_terminal(&state);
        let phase = if result.is_some() {
            TurnPhase::GameOver
        } else {
            TurnPhase::TurnStart
        };
        Self {
            rules,
            state,
            phase,
            snapshot: None,
            result,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.state.active_player
    }

    /// The snapshot taken at the start of the current turn.
    #[must_use]
    pub fn snapshot(&self) -> Option<&TurnSnapshot> {
        self.snapshot.as_ref()
    }

    fn expect_phase(&self, expected: TurnPhase) -> EngineResult<()> {
        if self.phase == TurnPhase::GameOver {
            return Err(EngineError::GameOver);
        }
        if self.phase != expected {
            return Err(EngineError::WrongPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    // === Turn steps ===

    /// Start the active player's turn.
    pub fn begin_turn(&mut self) -> EngineResult<()> {
        self.expect_phase(TurnPhase::TurnStart)?;

        let player = self.state.active_player;
        self.state.sort_rack(player);
        self.state.player_mut(player).first_move = true;
        self.state.action_sequence = 0;
        self.snapshot = Some(TurnSnapshot::take(&self.state));

        self.phase = TurnPhase::Acting;
        info!(
            player = %player,
            turn = self.state.turn_number,
            rack = self.state.player(player).rack.len(),
            "turn started"
        );
        Ok(())
    }

    /// Legal actions for the active player, empty outside `Acting`.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        if self.phase != TurnPhase::Acting {
            return Vec::new();
        }
        self.rules.legal_actions(&self.state, self.state.active_player)
    }

    /// One line per action, for presenting a numbered list.
    #[must_use]
    pub fn describe(&self, actions: &[Action]) -> Vec<String> {
        actions
            .iter()
            .map(|a| a.describe(&self.state.board, self.state.catalog()))
            .collect()
    }

    /// Apply one action for the active player.
    ///
    /// Returns the outcome if the action ended the turn.
    pub fn act(&mut self, action: Action) -> EngineResult<Option<TurnOutcome>> {
        self.expect_phase(TurnPhase::Acting)?;

        if !self.legal_actions().contains(&action) {
            return Err(EngineError::IllegalAction { action });
        }

        let player = self.state.active_player;
        self.rules.apply_action(&mut self.state, player, &action);

        if action.ends_turn() {
            return self.end_turn(true).map(Some);
        }
        Ok(None)
    }

    /// The active player is done acting. Validate and commit or roll back.
    pub fn finish_turn(&mut self) -> EngineResult<TurnOutcome> {
        self.expect_phase(TurnPhase::Acting)?;
        self.end_turn(false)
    }

    fn end_turn(&mut self, drew: bool) -> EngineResult<TurnOutcome> {
        let player = self.state.active_player;
        let Some(snapshot) = self.snapshot.take() else {
            return Err(EngineError::WrongPhase {
                expected: TurnPhase::Acting,
                actual: self.phase,
            });
        };

        let outcome = if drew && self.state.board == snapshot.board {
            TurnOutcome::Drew
        } else {
            match self.rules.board_verdict(&self.state, player) {
                Ok(_) if drew => {
                    self.rules.fix(&mut self.state);
                    TurnOutcome::Drew
                }
                Ok(_) if self.state.player(player).first_move => {
                    // Rearranging alone does not count as a move
                    self.state.board = snapshot.board;
                    self.state.locations = snapshot.locations;
                    self.state.action_history.truncate(snapshot.history_len);
                    self.forced_draw(player);
                    TurnOutcome::Passed
                }
                Ok(points) => {
                    self.rules.fix(&mut self.state);
                    self.state.player_mut(player).in_quarantine = false;
                    TurnOutcome::Committed { points }
                }
                Err(reason) => {
                    self.roll_back(snapshot, drew);
                    TurnOutcome::RolledBack { reason }
                }
            }
        };

        match outcome {
            TurnOutcome::Committed { points } => {
                info!(player = %player, points, "turn committed");
                self.state.idle_turns = 0;
            }
            TurnOutcome::RolledBack { reason } => {
                info!(player = %player, %reason, "board invalid, turn rolled back");
                self.state.idle_turns += 1;
            }
            TurnOutcome::Passed | TurnOutcome::Drew => {
                info!(player = %player, ?outcome, "turn ended without a play");
                self.state.idle_turns += 1;
            }
        }

        self.state.refresh_score(player);
        self.state.advance_turn();

        self.result = self.rules.is_terminal(&self.state);
        self.phase = match &self.result {
            Some(result) => {
                info!(?result, "game over");
                TurnPhase::GameOver
            }
            None => TurnPhase::TurnStart,
        };

        Ok(outcome)
    }

    /// Restore everything the turn changed, then make the penalty draw.
    ///
    /// A draw that ended the turn already took a tile from the pouch. That
    /// tile and its history record survive the restore and stand in for the
    /// penalty.
    fn roll_back(&mut self, snapshot: TurnSnapshot, drew: bool) {
        let player = snapshot.player;
        let (drawn, draw_record): (Vec<TileId>, _) = if drew {
            let rack = &self.state.player(player).rack;
            (
                rack.iter().filter(|&t| !snapshot.rack.contains(t)).collect(),
                self.state.action_history.last().cloned(),
            )
        } else {
            (Vec::new(), None)
        };

        self.state.board = snapshot.board;
        self.state.locations = snapshot.locations;
        self.state.player_mut(player).rack = snapshot.rack;
        self.state.action_history.truncate(snapshot.history_len);

        if !drew {
            self.forced_draw(player);
            return;
        }
        for tile in drawn {
            self.state.player_mut(player).rack.push(tile);
            self.state.locations.move_to(tile, Location::Rack(player));
        }
        if let Some(record) = draw_record {
            self.state.record_action(record);
        }
    }

    fn forced_draw(&mut self, player: PlayerId) {
        self.rules.apply_action(&mut self.state, player, &Action::DrawTile);
    }

    // === Driving play ===

    /// Play the active player's whole turn, asking `source` for each step.
    #[instrument(
        level = "debug",
        skip(self, source, renderer),
        fields(player = %self.state.active_player, turn = self.state.turn_number)
    )]
    pub fn play_turn(
        &mut self,
        source: &mut impl ActionSource,
        renderer: &mut impl RackRenderer,
    ) -> EngineResult<TurnOutcome> {
        self.begin_turn()?;
        let player = self.state.active_player;

        let rack = self.state.player(player).rack.tiles(self.state.catalog());
        renderer.render(player, &rack);

        loop {
            let actions = self.legal_actions();
            let options = self.describe(&actions);

            match source.choose(player, &options) {
                Choice::Done => return self.finish_turn(),
                Choice::Index(index) => {
                    let Some(&action) = actions.get(index) else {
                        warn!(index, available = actions.len(), "choice out of range, asking again");
                        continue;
                    };
                    debug!(index, action = %options[index], "chosen");
                    if let Some(outcome) = self.act(action)? {
                        return Ok(outcome);
                    }
                }
            }
        }
    }

    /// Play turns until the game ends or `max_turns` turns have been played.
    ///
    /// Returns the result, or `None` if the turn limit came first.
    pub fn play(
        &mut self,
        source: &mut impl ActionSource,
        renderer: &mut impl RackRenderer,
        max_turns: u32,
    ) -> EngineResult<Option<GameResult>> {
        for _ in 0..max_turns {
            if self.phase == TurnPhase::GameOver {
                break;
            }
            self.play_turn(source, renderer)?;
        }
        Ok(self.result.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{End, Target};
    use crate::core::entity::TileId;
    use crate::turn::shell::ScriptedSource;
    use crate::zones::{Location, MeldKind};

    // Standard layout: red 0..12, blue 13..25, orange 26..38, black 39..51.
    fn engine_with_racks(racks: &[&[u16]]) -> TurnEngine {
        let config = GameConfig::new(racks.len());
        let mut state = GameState::undealt(config, 11).unwrap();
        for (i, rack) in racks.iter().enumerate() {
            for &tile in rack.iter() {
                assert!(state.give_tile(PlayerId::new(i as u8), TileId(tile)));
            }
        }
        TurnEngine::new(state, StandardRules)
    }

    fn new_meld(tile: u16) -> Action {
        Action::AddFromRack { tile: TileId(tile), target: Target::NewMeld, end: End::Back }
    }

    fn append(engine: &TurnEngine, anchor: u16, tile: u16) -> Action {
        let meld = engine.state().board.meld_of(TileId(anchor)).unwrap().id;
        Action::AddFromRack { tile: TileId(tile), target: Target::Meld(meld), end: End::Back }
    }

    fn play_meld(engine: &mut TurnEngine, tiles: &[u16]) {
        engine.act(new_meld(tiles[0])).unwrap();
        for &tile in &tiles[1..] {
            let action = append(engine, tiles[0], tile);
            engine.act(action).unwrap();
        }
    }

    #[test]
    fn test_begin_turn_snapshots_and_sorts() {
        let mut engine = engine_with_racks(&[&[20, 3, 45], &[7]]);
        engine.begin_turn().unwrap();

        assert_eq!(engine.phase(), TurnPhase::Acting);
        let rack = &engine.state().player(PlayerId::new(0)).rack;
        assert_eq!(rack.as_slice(), &[TileId(45), TileId(20), TileId(3)]);
        assert_eq!(engine.snapshot().unwrap().player, PlayerId::new(0));
    }

    #[test]
    fn test_wrong_phase_errors() {
        let mut engine = engine_with_racks(&[&[1], &[2]]);

        assert_eq!(
            engine.finish_turn(),
            Err(EngineError::WrongPhase { expected: TurnPhase::Acting, actual: TurnPhase::TurnStart })
        );
        engine.begin_turn().unwrap();
        assert!(matches!(engine.begin_turn(), Err(EngineError::WrongPhase { .. })));
    }

    #[test]
    fn test_illegal_action_rejected() {
        let mut engine = engine_with_racks(&[&[1], &[2]]);
        engine.begin_turn().unwrap();

        // Tile 2 belongs to the other player
        let result = engine.act(new_meld(2));
        assert_eq!(result, Err(EngineError::IllegalAction { action: new_meld(2) }));
    }

    #[test]
    fn test_draw_ends_turn() {
        let mut engine = engine_with_racks(&[&[1], &[2]]);
        engine.begin_turn().unwrap();

        let outcome = engine.act(Action::DrawTile).unwrap();

        assert_eq!(outcome, Some(TurnOutcome::Drew));
        assert_eq!(engine.state().player(PlayerId::new(0)).rack.len(), 2);
        assert_eq!(engine.active_player(), PlayerId::new(1));
        assert_eq!(engine.phase(), TurnPhase::TurnStart);
        assert!(engine.state().check_ownership().is_ok());
    }

    #[test]
    fn test_done_without_play_forces_draw() {
        let mut state = GameState::undealt(GameConfig::new(2), 11).unwrap();
        state.give_tile(PlayerId::new(0), TileId(1));
        state.give_tile(PlayerId::new(1), TileId(2));
        state.player_mut(PlayerId::new(0)).in_quarantine = false;
        let mut engine = TurnEngine::new(state, StandardRules);
        engine.begin_turn().unwrap();

        assert_eq!(engine.finish_turn().unwrap(), TurnOutcome::Passed);
        assert_eq!(engine.state().player(PlayerId::new(0)).rack.len(), 2);
        assert_eq!(engine.state().idle_turns, 1);
    }

    #[test]
    fn test_quarantined_done_without_play_rolls_back() {
        let mut engine = engine_with_racks(&[&[1], &[2]]);
        engine.begin_turn().unwrap();

        assert_eq!(
            engine.finish_turn().unwrap(),
            TurnOutcome::RolledBack {
                reason: BoardRejection::QuarantineUnmet { total: 0, threshold: 30 }
            }
        );
        assert_eq!(engine.state().player(PlayerId::new(0)).rack.len(), 2);
        assert_eq!(engine.state().idle_turns, 1);
    }

    #[test]
    fn test_commit_leaves_quarantine() {
        // red 10, 11, 12 = 33
        let mut engine = engine_with_racks(&[&[9, 10, 11, 40], &[2]]);
        engine.begin_turn().unwrap();
        play_meld(&mut engine, &[9, 10, 11]);

        let outcome = engine.finish_turn().unwrap();

        assert_eq!(outcome, TurnOutcome::Committed { points: 33 });
        let p0 = engine.state().player(PlayerId::new(0));
        assert!(!p0.in_quarantine);
        assert_eq!(p0.rack.len(), 1);
        // Black 2 left on the rack
        assert_eq!(p0.score, 2);
        let meld = engine.state().board.melds().next().unwrap();
        assert_eq!(meld.kind, MeldKind::Run);
        assert!(meld.tiles.iter().all(|&t| engine.state().locations.is_on_board(t)));
        assert_eq!(engine.state().idle_turns, 0);
    }

    #[test]
    fn test_invalid_board_rolls_back() {
        let mut engine = engine_with_racks(&[&[0, 14, 28], &[2]]);
        engine.begin_turn().unwrap();
        // red 1, blue 2, orange 3 is neither a run nor a group
        play_meld(&mut engine, &[0, 14, 28]);

        let outcome = engine.finish_turn().unwrap();

        assert!(matches!(outcome, TurnOutcome::RolledBack { .. }));
        assert!(engine.state().board.is_empty());
        let rack = &engine.state().player(PlayerId::new(0)).rack;
        assert_eq!(rack.len(), 4);
        for tile in [0, 14, 28] {
            assert_eq!(
                engine.state().locations.get(TileId(tile)),
                Some(Location::Rack(PlayerId::new(0)))
            );
        }
        assert!(engine.state().check_ownership().is_ok());
    }

    #[test]
    fn test_split_only_turn_restores_board() {
        let config = GameConfig::new(2);
        let mut state = GameState::undealt(config, 5).unwrap();
        state.give_tile(PlayerId::new(0), TileId(30));
        state.give_tile(PlayerId::new(1), TileId(31));
        state.player_mut(PlayerId::new(0)).in_quarantine = false;
        let run = state
            .place_meld(MeldKind::Run, &[TileId(0), TileId(1), TileId(2), TileId(3), TileId(4), TileId(5)])
            .unwrap();
        let before = state.board.clone();
        let mut engine = TurnEngine::new(state, StandardRules);

        engine.begin_turn().unwrap();
        engine.act(Action::Split { meld: run, at: 3 }).unwrap();

        assert_eq!(engine.finish_turn().unwrap(), TurnOutcome::Passed);
        assert_eq!(engine.state().board, before);

        // The undone split leaves no trace in history, only the penalty draw
        let history: Vec<Action> = engine.state().action_history.iter().map(|r| r.action).collect();
        assert_eq!(history, vec![Action::DrawTile]);
    }

    #[test]
    fn test_draw_after_legal_split_keeps_fixed_board() {
        let mut state = GameState::undealt(GameConfig::new(2), 5).unwrap();
        state.give_tile(PlayerId::new(0), TileId(30));
        state.give_tile(PlayerId::new(1), TileId(31));
        state.player_mut(PlayerId::new(0)).in_quarantine = false;
        let run = state
            .place_meld(MeldKind::Run, &[TileId(0), TileId(1), TileId(2), TileId(3), TileId(4), TileId(5)])
            .unwrap();
        let mut engine = TurnEngine::new(state, StandardRules);

        engine.begin_turn().unwrap();
        engine.act(Action::Split { meld: run, at: 3 }).unwrap();
        assert_eq!(engine.act(Action::DrawTile).unwrap(), Some(TurnOutcome::Drew));

        let state = engine.state();
        let kinds: Vec<(MeldKind, usize)> = state.board.melds().map(|m| (m.kind, m.len())).collect();
        assert_eq!(kinds, vec![(MeldKind::Run, 3), (MeldKind::Run, 3)]);
        assert_eq!(state.player(PlayerId::new(0)).rack.len(), 2);
        assert_eq!(state.action_history.len(), 2);
        assert!(state.check_ownership().is_ok());
    }

    #[test]
    fn test_play_turn_with_scripted_source() {
        let mut engine = engine_with_racks(&[&[5], &[6]]);
        let mut source = ScriptedSource::new([Choice::Index(99), Choice::Index(0)]);

        let outcome = engine.play_turn(&mut source, &mut ()).unwrap();

        // Out-of-range index is skipped, index 0 is the draw
        assert_eq!(outcome, TurnOutcome::Drew);
        assert_eq!(engine.active_player(), PlayerId::new(1));
    }

    #[test]
    fn test_game_over_blocks_turns() {
        let mut engine = engine_with_racks(&[&[9, 10, 11], &[2]]);
        engine.begin_turn().unwrap();
        play_meld(&mut engine, &[9, 10, 11]);
        engine.finish_turn().unwrap();

        assert_eq!(engine.phase(), TurnPhase::GameOver);
        assert_eq!(engine.result(), Some(&GameResult::Winner(PlayerId::new(0))));
        assert_eq!(engine.begin_turn(), Err(EngineError::GameOver));
    }
}
