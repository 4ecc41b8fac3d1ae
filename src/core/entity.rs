//! Stable identities for physical tiles and board melds.
//!
//! Every physical tile gets a `TileId` when the catalog is built. The id never
//! changes for the rest of the game, so it is safe to use as a hash key while
//! the tile moves between the pouch, a rack, and the board.
//!
//! ## Usage
//!
//! ```
//! use rummikub_engine::core::{MeldId, TileId};
//!
//! let tile = TileId(7);
//! assert_eq!(tile.index(), 7);
//!
//! let meld = MeldId(3);
//! assert_eq!(format!("{}", meld), "Meld(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Identity of one physical tile.
///
/// Two tiles with the same face (color and number) still have different ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

impl TileId {
    /// Index into the tile catalog.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for TileId {
    fn from(id: u16) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// Identity of a meld on the board.
///
/// Allocated by the board. A split or a reclassification never reuses an id,
/// so an action that names a meld always refers to the meld it was generated
/// against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeldId(pub u32);

impl MeldId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MeldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Meld({})", self.0)
    }
}
