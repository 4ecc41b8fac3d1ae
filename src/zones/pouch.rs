//! The pouch: undrawn tiles.

use serde::{Deserialize, Serialize};

use crate::core::entity::TileId;
use crate::core::rng::GameRng;

/// Bag of undrawn tiles.
///
/// Draws are uniform without replacement. The pouch owns no randomness of its
/// own; callers pass the game's `GameRng` so draws are reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pouch {
    tiles: Vec<TileId>,
}

impl Pouch {
    /// An empty pouch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a pouch with `tiles` and shuffle them.
    pub fn filled(tiles: impl IntoIterator<Item = TileId>, rng: &mut GameRng) -> Self {
        let mut tiles: Vec<TileId> = tiles.into_iter().collect();
        rng.shuffle(&mut tiles);
        Self { tiles }
    }

    /// Draw one tile uniformly at random.
    ///
    /// Returns `None` when the pouch is empty.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<TileId> {
        if self.tiles.is_empty() {
            return None;
        }
        let index = rng.pick_index(self.tiles.len());
        Some(self.tiles.swap_remove(index))
    }

    /// Remove a specific tile. Returns false if the pouch did not hold it.
    pub fn take(&mut self, tile: TileId) -> bool {
        if let Some(pos) = self.tiles.iter().position(|&t| t == tile) {
            self.tiles.swap_remove(pos);
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

    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().copied()
    }
}
