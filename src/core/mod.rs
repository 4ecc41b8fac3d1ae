//! Core engine types: identities, players, state, actions, RNG, configuration,
//! errors.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use entity::{MeldId, TileId};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::GameConfig;
pub use action::{Action, ActionRecord, End, Target};
pub use error::{EngineError, EngineResult};
pub use state::GameState;
