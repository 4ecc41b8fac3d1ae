//! # rummikub-engine
//!
//! Rules engine for Rummikub-style tile games: a shared board of melds,
//! private racks, and a pouch to draw from.
//!
//! ## Design Principles
//!
//! 1. **Stable Identity**: every physical tile is a `TileId` minted once by
//!    the `TileCatalog`. Where a tile is lives in a separate `LocationTable`,
//!    so identity never changes while tiles move.
//!
//! 2. **Rule Failures Are Data**: an illegal board is a `BoardRejection`,
//!    not an error. The turn engine reads it and rolls the turn back.
//!
//! 3. **Deterministic Play**: the pouch draws from a seeded `GameRng`, and
//!    legal actions come back in a fixed order, so a game replays exactly
//!    from its seed and its choice indices.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: board and location table are `im`
//!   collections, so the per-turn rollback snapshot is O(1).
//!
//! - **Closed Meld Kinds**: `MeldKind::{Group, Run, Provisional}` is matched
//!   exhaustively by the checker and the applier.
//!
//! ## Modules
//!
//! - `core`: ids, players, state, actions, RNG, configuration, errors
//! - `tiles`: tile faces and the catalog
//! - `zones`: pouch, racks, board, location table
//! - `rules`: validity checker, move generator, move applier, `RulesEngine`
//! - `turn`: turn state machine and the shell seams
//!
//! ## Example
//!
//! ```
//! use rummikub_engine::{GameConfig, ScriptedSource, Choice, TurnEngine, TurnOutcome};
//!
//! let mut engine = TurnEngine::standard(GameConfig::new(2), 7).unwrap();
//!
//! // Index 0 is always the draw at the start of a turn
//! let mut source = ScriptedSource::new([Choice::Index(0)]);
//! let outcome = engine.play_turn(&mut source, &mut ()).unwrap();
//!
//! assert_eq!(outcome, TurnOutcome::Drew);
//! ```

pub mod core;
pub mod tiles;
pub mod zones;
pub mod rules;
pub mod turn;

// Re-export commonly used types
pub use crate::core::{
    MeldId, TileId, Player, PlayerId, PlayerMap,
    GameRng, GameConfig,
    Action, ActionRecord, End, Target,
    EngineError, EngineResult, GameState,
};

pub use crate::tiles::{Color, Face, Tile, TileCatalog};

pub use crate::zones::{Board, Location, LocationTable, Meld, MeldKind, Pouch, Rack};

pub use crate::rules::{BoardRejection, GameResult, MeldCheck, RulesEngine, StandardRules};

pub use crate::turn::{
    ActionSource, Choice, RackRenderer, ScriptedSource, TextShell,
    TurnEngine, TurnOutcome, TurnPhase, TurnSnapshot,
};
