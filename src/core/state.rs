//! Game state.
//!
//! `GameState` owns everything that changes during play:
//! - Board melds and joker resolutions
//! - Pouch and RNG
//! - Players (racks, quarantine, first-move flags, scores)
//! - Tile location table
//! - Turn counters and action history
//!
//! plus the immutable configuration and tile catalog the rules read.

use im::Vector;

use super::action::ActionRecord;
use super::config::GameConfig;
use super::entity::{MeldId, TileId};
use super::error::{EngineError, EngineResult};
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::tiles::TileCatalog;
use crate::zones::{Board, Location, LocationTable, MeldKind, Pouch};

/// Full game state.
#[derive(Clone, Debug)]
pub struct GameState {
    config: GameConfig,
    catalog: TileCatalog,

    /// Shared melds.
    pub board: Board,

    /// Undrawn tiles.
    pub pouch: Pouch,

    /// Seats, indexed by `PlayerId`.
    pub players: PlayerMap<Player>,

    /// Which container holds each tile.
    pub locations: LocationTable,

    /// Deterministic RNG for pouch draws.
    pub rng: GameRng,

    /// Player whose turn it is.
    pub active_player: PlayerId,

    /// Turn number (starts at 1).
    pub turn_number: u32,

    /// Action sequence within turn.
    pub action_sequence: u32,

    /// Every applied action, in order.
    pub action_history: Vector<ActionRecord>,

    /// Consecutive turns that ended without a commit.
    pub idle_turns: u32,
}

impl GameState {
    /// Set up a new game: build the tiles, shuffle the pouch, deal racks.
    ///
    /// Every player starts in quarantine.
    pub fn new(config: GameConfig, seed: u64) -> EngineResult<Self> {
        let mut state = Self::undealt(config, seed)?;

        for player in PlayerId::all(state.player_count()) {
            for _ in 0..state.config.rack_size {
                let Some(tile) = state.pouch.draw(&mut state.rng) else {
                    return Err(EngineError::PouchExhausted {
                        needed: state.player_count() * state.config.rack_size,
                        available: state.catalog.len(),
                    });
                };
                state.players[player].rack.push(tile);
                state.locations.move_to(tile, Location::Rack(player));
            }
            state.refresh_score(player);
        }

        Ok(state)
    }

    /// A game with every tile still in the pouch and empty racks.
    ///
    /// Use `give_tile` and `place_meld` to lay out a specific position.
    pub fn undealt(config: GameConfig, seed: u64) -> EngineResult<Self> {
        config.validate()?;

        let catalog = TileCatalog::build(&config);
        let base = GameRng::new(seed);
        let pouch = Pouch::filled(catalog.ids(), &mut base.for_context("shuffle"));
        let rng = base.for_context("draw");

        let mut locations = LocationTable::new();
        for id in catalog.ids() {
            locations.place(id, Location::Pouch);
        }

        Ok(Self {
            players: PlayerMap::new(config.player_count, |_| Player::new()),
            config,
            catalog,
            board: Board::new(),
            pouch,
            locations,
            rng,
            active_player: PlayerId::new(0),
            turn_number: 1,
            action_sequence: 0,
            action_history: Vector::new(),
            idle_turns: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &TileCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    /// Board and location table for mutation, with the catalog to read
    /// faces from.
    pub fn board_parts_mut(&mut self) -> (&mut Board, &mut LocationTable, &TileCatalog) {
        (&mut self.board, &mut self.locations, &self.catalog)
    }

    // === Setup ===

    /// Move a specific tile from the pouch to a player's rack.
    ///
    /// Returns false if the tile is not in the pouch.
    pub fn give_tile(&mut self, player: PlayerId, tile: TileId) -> bool {
        if self.locations.get(tile) != Some(Location::Pouch) {
            return false;
        }
        self.pouch.take(tile);
        self.players[player].rack.push(tile);
        self.locations.move_to(tile, Location::Rack(player));
        self.refresh_score(player);
        true
    }

    /// Move specific tiles from the pouch straight onto the board as a
    /// committed meld.
    ///
    /// Returns `None` if any tile is not in the pouch; nothing moves then.
    pub fn place_meld(&mut self, kind: MeldKind, tiles: &[TileId]) -> Option<MeldId> {
        if tiles.iter().any(|&t| self.locations.get(t) != Some(Location::Pouch)) {
            return None;
        }
        for &tile in tiles {
            self.pouch.take(tile);
            self.locations.move_to(tile, Location::Board { committed: true });
        }
        Some(self.board.push_meld(kind, tiles.to_vec()))
    }

    // === Turn bookkeeping ===

    /// Order a player's rack by face.
    pub fn sort_rack(&mut self, player: PlayerId) {
        self.players[player].rack.sort(&self.catalog);
    }

    /// Recompute a player's score from their rack.
    pub fn refresh_score(&mut self, player: PlayerId) {
        let score = self.players[player].rack.points(&self.catalog);
        self.players[player].score = score;
    }

    /// Record an action in history.
    pub fn record_action(&mut self, record: ActionRecord) {
        self.action_history.push_back(record);
    }

    /// Get the next action sequence number and increment.
    pub fn next_sequence(&mut self) -> u32 {
        let seq = self.action_sequence;
        self.action_sequence += 1;
        seq
    }

    /// Pass the turn to the next seat.
    pub fn advance_turn(&mut self) {
        self.active_player = self.active_player.next(self.player_count());
        self.turn_number += 1;
        self.action_sequence = 0;
    }

    // === Invariants ===

    /// Verify that every tile is held by exactly one container and that the
    /// location table agrees.
    pub fn check_ownership(&self) -> EngineResult<()> {
        let violation = |tile: TileId, msg: String| Err(EngineError::OwnershipViolation { tile, msg });

        for tile in self.catalog.ids() {
            let mut holders = Vec::new();
            if self.pouch.contains(tile) {
                holders.push(Location::Pouch);
            }
            for (player, seat) in self.players.iter() {
                if seat.rack.contains(tile) {
                    holders.push(Location::Rack(player));
                }
            }
            let on_board = self.board.melds().filter(|m| m.tiles.contains(&tile)).count();
            for _ in 0..on_board {
                holders.push(Location::Board { committed: false });
            }

            let [holder] = holders.as_slice() else {
                return violation(tile, format!("held by {} containers", holders.len()));
            };

            let recorded = self.locations.get(tile);
            let agrees = match (holder, recorded) {
                (Location::Board { .. }, Some(Location::Board { .. })) => true,
                (held, Some(recorded)) => *held == recorded,
                (_, None) => false,
            };
            if !agrees {
                return violation(tile, format!("held in {holder:?}, recorded as {recorded:?}"));
            }
        }

        let total = self.pouch.len()
            + self.players.iter().map(|(_, p)| p.rack.len()).sum::<usize>()
            + self.board.tiles().count();
        if total != self.catalog.len() {
            return Err(EngineError::OwnershipViolation {
                tile: TileId(0),
                msg: format!("{total} tiles in containers, catalog has {}", self.catalog.len()),
            });
        }

        Ok(())
    }
}
