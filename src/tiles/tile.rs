//! Tile faces and physical tiles.
//!
//! A `Face` is what meld-shape rules look at: a color and a number. A `Tile`
//! is one physical unit of inventory: a stable `TileId` plus its printed face.
//! Two tiles can share a face and still be different tiles.

use serde::{Deserialize, Serialize};

use crate::core::entity::TileId;

/// Tile color.
///
/// Declaration order is the rack sort order. `Joker` is the sentinel color
/// printed on jokers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Blue,
    Orange,
    Red,
    Joker,
}

impl Color {
    /// The four suit colors of a standard set.
    pub const STANDARD: [Color; 4] = [Color::Red, Color::Blue, Color::Orange, Color::Black];
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Orange => "orange",
            Color::Red => "red",
            Color::Joker => "JOKER",
        };
        f.write_str(name)
    }
}

/// Color and number as seen by the shape rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Face {
    pub color: Color,
    pub number: u8,
}

impl Face {
    #[must_use]
    pub const fn new(color: Color, number: u8) -> Self {
        Self { color, number }
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.color, self.number)
    }
}

/// One physical tile.
///
/// Immutable once the catalog is built. Where the tile currently lives is
/// tracked by `LocationTable`, and what a placed joker stands for is tracked
/// by the board, so nothing here changes during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// Printed face. For jokers this is `(JOKER, joker_value)`.
    pub face: Face,
    pub is_joker: bool,
}

impl Tile {
    /// A numbered tile.
    #[must_use]
    pub const fn numbered(id: TileId, color: Color, number: u8) -> Self {
        Self {
            id,
            face: Face::new(color, number),
            is_joker: false,
        }
    }

    /// A joker carrying its rack penalty value as its printed number.
    #[must_use]
    pub const fn joker(id: TileId, value: u8) -> Self {
        Self {
            id,
            face: Face::new(Color::Joker, value),
            is_joker: true,
        }
    }

    /// Points this tile costs while still on a rack.
    #[must_use]
    pub fn points(&self) -> u32 {
        u32::from(self.face.number)
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_joker {
            f.write_str("(JOKER)")
        } else {
            write!(f, "{}", self.face)
        }
    }
}
