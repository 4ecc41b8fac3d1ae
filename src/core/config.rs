//! Game configuration.
//!
//! `GameConfig` fixes everything about a game that does not change once the
//! tiles are made: how many seats, which colors, how many copies, how many
//! jokers, the rack size, and the initial-meld threshold.
//!
//! ```
//! use rummikub_engine::core::GameConfig;
//!
//! let config = GameConfig::new(3).with_jokers(0).with_rack_size(10);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.total_tiles(), 104);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{EngineError, EngineResult};
use crate::tiles::Color;

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of players (1-255).
    pub player_count: usize,

    /// Suit colors in play.
    pub colors: Vec<Color>,

    /// Copies of each (color, number) face.
    pub copies: u8,

    /// Highest printed number.
    pub max_number: u8,

    /// Jokers added to the pouch.
    pub joker_count: u8,

    /// Points a joker costs while on a rack.
    pub joker_value: u8,

    /// Tiles dealt to each player.
    pub rack_size: usize,

    /// Points a quarantined player's new melds must reach.
    pub initial_meld_threshold: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_count: 2,
            colors: Color::STANDARD.to_vec(),
            copies: 2,
            max_number: 13,
            joker_count: 2,
            joker_value: 30,
            rack_size: 14,
            initial_meld_threshold: 30,
        }
    }
}

impl GameConfig {
    /// Standard set for `player_count` players.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            ..Self::default()
        }
    }

    /// Set the suit colors.
    #[must_use]
    pub fn with_colors(mut self, colors: &[Color]) -> Self {
        self.colors = colors.to_vec();
        self
    }

    /// Set the joker count.
    #[must_use]
    pub fn with_jokers(mut self, count: u8) -> Self {
        self.joker_count = count;
        self
    }

    /// Set the number of tiles dealt per player.
    #[must_use]
    pub fn with_rack_size(mut self, size: usize) -> Self {
        self.rack_size = size;
        self
    }

    /// Set the initial-meld threshold.
    #[must_use]
    pub fn with_initial_meld_threshold(mut self, points: u32) -> Self {
        self.initial_meld_threshold = points;
        self
    }

    /// Total tiles the catalog will hold.
    #[must_use]
    pub fn total_tiles(&self) -> usize {
        usize::from(self.copies) * self.colors.len() * usize::from(self.max_number)
            + usize::from(self.joker_count)
    }

    /// Check that this configuration can produce a playable game.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig { msg: msg.to_string() });

        if self.player_count == 0 {
            return invalid("must have at least 1 player");
        }
        if self.player_count > 255 {
            return invalid("at most 255 players supported");
        }
        if self.colors.is_empty() {
            return invalid("at least one color is required");
        }
        if self.colors.contains(&Color::Joker) {
            return invalid("JOKER is not a suit color");
        }
        let mut sorted = self.colors.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.colors.len() {
            return invalid("colors must be distinct");
        }
        if self.max_number == 0 || self.copies == 0 {
            return invalid("max_number and copies must be non-zero");
        }
        if self.total_tiles() > usize::from(u16::MAX) {
            return invalid("too many tiles");
        }

        let needed = self.player_count * self.rack_size;
        if needed > self.total_tiles() {
            return Err(EngineError::PouchExhausted {
                needed,
                available: self.total_tiles(),
            });
        }

        Ok(())
    }
}
