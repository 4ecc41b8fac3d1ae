//! Tile location tracking.
//!
//! `LocationTable` maps every `TileId` to the one container that holds it.
//! It is the lookup table for "is this tile committed to the board", kept
//! apart from the tile itself so tile identity never changes while a tile
//! moves.

use im::HashMap as ImHashMap;

use crate::core::entity::TileId;
use crate::core::player::PlayerId;

/// Container currently holding a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    /// Undrawn.
    Pouch,
    /// On a player's rack.
    Rack(PlayerId),
    /// In a board meld. `committed` is set once the turn that placed the
    /// tile has been validated and fixed.
    Board { committed: bool },
}

/// Location of every tile in the game.
///
/// Backed by `im::HashMap` so turn snapshots are O(1).
///
/// ```
/// use rummikub_engine::core::{PlayerId, TileId};
/// use rummikub_engine::zones::{Location, LocationTable};
///
/// let mut table = LocationTable::new();
/// table.place(TileId(0), Location::Pouch);
///
/// let old = table.move_to(TileId(0), Location::Rack(PlayerId::new(1)));
/// assert_eq!(old, Some(Location::Pouch));
/// assert!(!table.is_on_board(TileId(0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocationTable {
    locations: ImHashMap<TileId, Location>,
}

impl LocationTable {
    /// Create a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tile's initial location.
    ///
    /// Returns false, leaving the table unchanged, if the tile is already
    /// tracked.
    pub fn place(&mut self, tile: TileId, location: Location) -> bool {
        if self.locations.contains_key(&tile) {
            return false;
        }
        self.locations.insert(tile, location);
        true
    }

    /// Move a tile to a new location.
    ///
    /// Returns the old location, or `None` if the tile wasn't tracked.
    pub fn move_to(&mut self, tile: TileId, location: Location) -> Option<Location> {
        let old = self.locations.get(&tile).copied()?;
        self.locations.insert(tile, location);
        Some(old)
    }

    /// Mark a board tile as committed. No effect on tiles elsewhere.
    pub fn commit(&mut self, tile: TileId) {
        if let Some(location) = self.locations.get_mut(&tile) {
            if matches!(location, Location::Board { .. }) {
                *location = Location::Board { committed: true };
            }
        }
    }

    #[must_use]
    pub fn get(&self, tile: TileId) -> Option<Location> {
        self.locations.get(&tile).copied()
    }

    /// True once the tile sits in a committed board position.
    #[must_use]
    pub fn is_on_board(&self, tile: TileId) -> bool {
        self.get(tile) == Some(Location::Board { committed: true })
    }

    /// Tiles in a location, in no particular order.
    pub fn tiles_in(&self, location: Location) -> impl Iterator<Item = TileId> + '_ {
        self.locations
            .iter()
            .filter(move |(_, &l)| l == location)
            .map(|(&t, _)| t)
    }

    /// Number of tiles tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileId, Location)> + '_ {
        self.locations.iter().map(|(&t, &l)| (t, l))
    }
}
