//! A player's private rack.

use serde::{Deserialize, Serialize};

use crate::core::entity::TileId;
use crate::tiles::{Tile, TileCatalog};

/// One player's private tile holdings.
///
/// Order is meaningful: the move generator walks the rack front to back, so
/// the rack order fixes the order of the offered actions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rack {
    tiles: Vec<TileId>,
}

impl Rack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_tiles(tiles: Vec<TileId>) -> Self {
        Self { tiles }
    }

    pub fn push(&mut self, tile: TileId) {
        self.tiles.push(tile);
    }

    /// Remove a tile. Returns false if the rack did not hold it.
    pub fn remove(&mut self, tile: TileId) -> bool {
        if let Some(pos) = self.tiles.iter().position(|&t| t == tile) {
            self.tiles.remove(pos);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn contains(&self, tile: TileId) -> bool {
        self.tiles.contains(&tile)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }

    /// Order tiles by (color, number), ties by id.
    pub fn sort(&mut self, catalog: &TileCatalog) {
        self.tiles.sort_by_key(|&id| (catalog.face(id), id));
    }

    /// Sum of printed numbers; jokers count their configured value.
    #[must_use]
    pub fn points(&self, catalog: &TileCatalog) -> u32 {
        self.tiles.iter().map(|&id| catalog[id].points()).sum()
    }

    /// Resolve the rack to full tiles, for rendering.
    #[must_use]
    pub fn tiles<'a>(&self, catalog: &'a TileCatalog) -> Vec<&'a Tile> {
        self.tiles.iter().map(|&id| &catalog[id]).collect()
    }
}
