//! The shared board: an ordered collection of melds.
//!
//! Melds are tagged with a closed `MeldKind`. Committed kinds (`Group`,
//! `Run`) always satisfy their shape; `Provisional` melds are assembled
//! during the current turn and are exempt until validated.
//!
//! The board is backed by `im::Vector`, so cloning it for a turn snapshot is
//! O(1) and only the melds touched during the turn are copied.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::action::End;
use crate::core::entity::{MeldId, TileId};
use crate::tiles::{Face, TileCatalog};

/// Meld shape tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeldKind {
    /// Committed: same number, distinct colors.
    Group,
    /// Committed: same color, consecutive numbers.
    Run,
    /// Uncommitted: shape not yet classified.
    Provisional,
}

impl MeldKind {
    #[must_use]
    pub const fn is_committed(self) -> bool {
        !matches!(self, MeldKind::Provisional)
    }
}

/// A meld on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meld {
    pub id: MeldId,
    pub kind: MeldKind,
    pub tiles: Vec<TileId>,
}

impl Meld {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The tile of a one-tile meld.
    #[must_use]
    pub fn single_tile(&self) -> Option<TileId> {
        match self.tiles.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Printed faces, in meld order.
    #[must_use]
    pub fn faces(&self, catalog: &TileCatalog) -> Vec<Face> {
        self.tiles.iter().map(|&id| catalog.face(id)).collect()
    }
}

/// Ordered set of melds shared by all players.
///
/// No tile appears in more than one meld. The board also remembers what each
/// committed joker stands for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    melds: Vector<Meld>,
    next_meld_id: u32,
    joker_faces: ImHashMap<TileId, Face>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a meld and return its new id.
    pub fn push_meld(&mut self, kind: MeldKind, tiles: Vec<TileId>) -> MeldId {
        let id = MeldId(self.next_meld_id);
        self.next_meld_id += 1;
        self.melds.push_back(Meld { id, kind, tiles });
        id
    }

    /// Remove a meld. Returns it, or `None` if no meld has this id.
    pub fn remove_meld(&mut self, id: MeldId) -> Option<Meld> {
        let index = self.position(id)?;
        Some(self.melds.remove(index))
    }

    /// Insert a tile at one end of a meld.
    ///
    /// Returns false if no meld has this id.
    pub fn insert_tile(&mut self, id: MeldId, tile: TileId, end: End) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let Some(meld) = self.melds.get_mut(index) else {
            return false;
        };
        let at = end.position(meld.tiles.len());
        meld.tiles.insert(at, tile);
        true
    }

    /// Retag the meld at `index`, keeping its place in board order.
    pub fn set_kind(&mut self, index: usize, kind: MeldKind) {
        if let Some(meld) = self.melds.get_mut(index) {
            meld.kind = kind;
        }
    }

    #[must_use]
    pub fn get(&self, id: MeldId) -> Option<&Meld> {
        self.melds.iter().find(|m| m.id == id)
    }

    /// Board-order index of a meld.
    #[must_use]
    pub fn position(&self, id: MeldId) -> Option<usize> {
        self.melds.iter().position(|m| m.id == id)
    }

    /// Melds in board order.
    pub fn melds(&self) -> impl Iterator<Item = &Meld> {
        self.melds.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.melds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.melds.is_empty()
    }

    /// Every tile on the board, meld by meld.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.melds.iter().flat_map(|m| m.tiles.iter().copied())
    }

    /// The meld holding `tile`, if any.
    #[must_use]
    pub fn meld_of(&self, tile: TileId) -> Option<&Meld> {
        self.melds.iter().find(|m| m.tiles.contains(&tile))
    }

    #[must_use]
    pub fn has_provisional(&self) -> bool {
        self.melds.iter().any(|m| m.kind == MeldKind::Provisional)
    }

    /// What a committed joker currently stands for.
    #[must_use]
    pub fn joker_face(&self, joker: TileId) -> Option<Face> {
        self.joker_faces.get(&joker).copied()
    }

    /// `[(red, 1), (red, 2), (JOKER)]`, or `[(red, 1), (red, 2), (JOKER) as (red, 3)]`
    /// once the meld is committed and the joker's face is known.
    #[must_use]
    pub fn describe_meld(&self, id: MeldId, catalog: &TileCatalog) -> Option<String> {
        let meld = self.get(id)?;
        let tiles: Vec<String> = meld
            .tiles
            .iter()
            .map(|&tile| match self.joker_face(tile) {
                Some(face) if meld.kind.is_committed() => format!("{} as {face}", catalog[tile]),
                _ => catalog[tile].to_string(),
            })
            .collect();
        Some(format!("[{}]", tiles.join(", ")))
    }

    /// Record what a joker stands for.
    pub fn set_joker_face(&mut self, joker: TileId, face: Face) {
        self.joker_faces.insert(joker, face);
    }

    /// Forget joker resolutions for jokers that left the board.
    pub fn prune_joker_faces(&mut self) {
        let jokers: Vec<TileId> = self.joker_faces.keys().copied().collect();
        for joker in jokers {
            if self.meld_of(joker).is_none() {
                self.joker_faces.remove(&joker);
            }
        }
    }
}
