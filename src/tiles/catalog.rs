//! The tile catalog: every physical tile in the game, indexed by `TileId`.
//!
//! Built once from a `GameConfig` and never mutated. All containers hold
//! `TileId`s and look faces up here.

use std::ops::Index;

use crate::core::config::GameConfig;
use crate::core::entity::TileId;

use super::tile::{Color, Face, Tile};

/// Immutable table of all tiles.
///
/// Ids are dense: `TileId(i)` is the `i`-th tile. Numbered tiles come first,
/// in (copy, color, number) order, then the jokers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileCatalog {
    tiles: Vec<Tile>,
    colors: Vec<Color>,
    max_number: u8,
}

impl TileCatalog {
    /// Build the full set described by `config`.
    ///
    /// ```
    /// use rummikub_engine::core::GameConfig;
    /// use rummikub_engine::tiles::TileCatalog;
    ///
    /// let catalog = TileCatalog::build(&GameConfig::default());
    /// assert_eq!(catalog.len(), 106);
    /// assert_eq!(catalog.jokers().count(), 2);
    /// ```
    #[must_use]
    pub fn build(config: &GameConfig) -> Self {
        let mut tiles = Vec::with_capacity(config.total_tiles());
        let mut next = 0u16;

        for _ in 0..config.copies {
            for &color in &config.colors {
                for number in 1..=config.max_number {
                    tiles.push(Tile::numbered(TileId(next), color, number));
                    next += 1;
                }
            }
        }

        for _ in 0..config.joker_count {
            tiles.push(Tile::joker(TileId(next), config.joker_value));
            next += 1;
        }

        Self {
            tiles,
            colors: config.colors.clone(),
            max_number: config.max_number,
        }
    }

    /// Build a catalog from explicit tiles. Ids must be dense and in order.
    ///
    /// Suit colors are taken in order of first appearance.
    #[must_use]
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        debug_assert!(tiles.iter().enumerate().all(|(i, t)| t.id.index() == i));

        let mut colors = Vec::new();
        let mut max_number = 0;
        for tile in tiles.iter().filter(|t| !t.is_joker) {
            if !colors.contains(&tile.face.color) {
                colors.push(tile.face.color);
            }
            max_number = max_number.max(tile.face.number);
        }

        Self {
            tiles,
            colors,
            max_number,
        }
    }

    /// Suit colors in play, in configuration order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Highest printed number on a numbered tile.
    #[must_use]
    pub fn max_number(&self) -> u8 {
        self.max_number
    }

    /// Look up a tile. `None` for ids this catalog did not mint.
    #[must_use]
    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Printed face of a tile.
    #[must_use]
    pub fn face(&self, id: TileId) -> Face {
        self[id].face
    }

    #[must_use]
    pub fn is_joker(&self, id: TileId) -> bool {
        self[id].is_joker
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// All tile ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    pub fn jokers(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| t.is_joker)
    }
}

impl Index<TileId> for TileCatalog {
    type Output = Tile;

    /// Panics on ids from another catalog.
    fn index(&self, id: TileId) -> &Self::Output {
        &self.tiles[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_layout() {
        let catalog = TileCatalog::build(&GameConfig::default());

        assert_eq!(catalog.len(), 106);
        // First color block is red 1..13
        assert_eq!(catalog.face(TileId(0)), Face::new(Color::Red, 1));
        assert_eq!(catalog.face(TileId(12)), Face::new(Color::Red, 13));
        assert_eq!(catalog.face(TileId(13)), Face::new(Color::Blue, 1));
        // Second copy starts after 4 * 13 tiles
        assert_eq!(catalog.face(TileId(52)), Face::new(Color::Red, 1));
        assert!(catalog.is_joker(TileId(104)));
        assert!(catalog.is_joker(TileId(105)));
    }

    #[test]
    fn test_every_face_appears_copies_times() {
        let config = GameConfig::default();
        let catalog = TileCatalog::build(&config);

        for &color in &config.colors {
            for number in 1..=config.max_number {
                let count = catalog
                    .ids()
                    .filter(|&id| catalog.face(id) == Face::new(color, number))
                    .count();
                assert_eq!(count, 2);
            }
        }
    }

    #[test]
    fn test_joker_face() {
        let catalog = TileCatalog::build(&GameConfig::default());
        let joker = catalog.jokers().next().unwrap();
        assert_eq!(joker.face, Face::new(Color::Joker, 30));
        assert_eq!(joker.points(), 30);
    }

    #[test]
    fn test_from_tiles_derives_colors() {
        let catalog = TileCatalog::from_tiles(vec![
            Tile::numbered(TileId(0), Color::Blue, 3),
            Tile::numbered(TileId(1), Color::Red, 9),
            Tile::joker(TileId(2), 30),
            Tile::numbered(TileId(3), Color::Blue, 4),
        ]);

        assert_eq!(catalog.colors(), &[Color::Blue, Color::Red]);
        assert_eq!(catalog.max_number(), 9);
    }

    #[test]
    fn test_get_unknown_id() {
        let catalog = TileCatalog::build(&GameConfig::default().with_jokers(0));
        assert!(catalog.get(TileId(103)).is_some());
        assert!(catalog.get(TileId(104)).is_none());
    }
}
