//! Player actions.
//!
//! An action names tiles and melds by identity, never by value, so it stays
//! unambiguous when two tiles or two melds look the same.
//!
//! - `DrawTile` - take one tile from the pouch; ends the turn
//! - `Split` - cut a meld in two
//! - `AddFromRack` - play a rack tile onto a meld end, or start a new meld
//! - `AddFromBoard` - move a lone board tile onto a meld end
//!
//! ```
//! use rummikub_engine::core::{Action, End, MeldId, Target, TileId};
//!
//! let play = Action::AddFromRack { tile: TileId(4), target: Target::NewMeld, end: End::Front };
//! assert!(play.is_rack_play());
//! assert!(!Action::DrawTile.is_rack_play());
//! ```

use serde::{Deserialize, Serialize};

use super::entity::{MeldId, TileId};
use super::player::PlayerId;
use crate::tiles::TileCatalog;
use crate::zones::Board;

/// Which end of a meld a tile is inserted at.
///
/// Meld interiors are never directly addressable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum End {
    /// Position 0.
    Front,
    /// Position `meld.len()`.
    Back,
}

impl End {
    /// Insertion index for a meld of `len` tiles.
    #[must_use]
    pub const fn position(self, len: usize) -> usize {
        match self {
            End::Front => 0,
            End::Back => len,
        }
    }
}

/// Where an added tile goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// An existing meld.
    Meld(MeldId),
    /// A brand-new provisional meld holding just the tile.
    NewMeld,
}

/// A complete player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Draw one tile from the pouch. Ends the turn.
    DrawTile,

    /// Replace `meld` with provisional melds `tiles[..at]` and `tiles[at..]`.
    Split { meld: MeldId, at: usize },

    /// Move a tile from the acting player's rack to the board.
    AddFromRack { tile: TileId, target: Target, end: End },

    /// Move the only tile of meld `source` onto an end of meld `target`.
    AddFromBoard {
        tile: TileId,
        source: MeldId,
        target: MeldId,
        end: End,
    },
}

impl Action {
    /// True for actions that take a tile off the rack.
    #[must_use]
    pub const fn is_rack_play(&self) -> bool {
        matches!(self, Action::AddFromRack { .. })
    }

    /// True for actions that end the turn on their own.
    #[must_use]
    pub const fn ends_turn(&self) -> bool {
        matches!(self, Action::DrawTile)
    }

    /// One-line description for the shell's action list.
    ///
    /// Melds are shown by content so the description does not depend on
    /// internal ids.
    #[must_use]
    pub fn describe(&self, board: &Board, catalog: &TileCatalog) -> String {
        let meld = |id: MeldId| {
            board
                .describe_meld(id, catalog)
                .unwrap_or_else(|| id.to_string())
        };
        let end = |end: End| match end {
            End::Front => "front",
            End::Back => "back",
        };

        match *self {
            Action::DrawTile => "draw a tile".to_string(),
            Action::Split { meld: id, at } => format!("split {} at position {at}", meld(id)),
            Action::AddFromRack { tile, target: Target::NewMeld, .. } => {
                format!("start a new set with {}", catalog[tile])
            }
            Action::AddFromRack { tile, target: Target::Meld(id), end: e } => {
                format!("add {} to {} at {}", catalog[tile], meld(id), end(e))
            }
            Action::AddFromBoard { tile, target, end: e, .. } => {
                format!("move {} from the board to {} at {}", catalog[tile], meld(target), end(e))
            }
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
