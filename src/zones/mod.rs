//! Tile containers: pouch, racks, and the board, plus the location table
//! that records which container holds each tile.
//!
//! ## Key Types
//!
//! - `Pouch`: undrawn tiles, drawn uniformly with the game RNG
//! - `Rack`: one player's private tiles
//! - `Board`: ordered melds shared by all players
//! - `LocationTable`: tile id -> current container

pub mod pouch;
pub mod rack;
pub mod board;
pub mod locations;

pub use pouch::Pouch;
pub use rack::Rack;
pub use board::{Board, Meld, MeldKind};
pub use locations::{Location, LocationTable};
