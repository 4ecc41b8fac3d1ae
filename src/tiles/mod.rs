//! Tile catalog: tile identity, faces, and comparison semantics.

pub mod tile;
pub mod catalog;

pub use tile::{Color, Face, Tile};
pub use catalog::TileCatalog;
