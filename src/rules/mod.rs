//! Game rules.
//!
//! - `validity`: meld shapes, joker resolution, whole-board checks, `fix`
//! - `generator`: ordered legal actions for the acting player
//! - `applier`: carry out one action
//! - `engine`: the `RulesEngine` trait the turn engine drives, and
//!   `StandardRules`
//!
//! Rule failures are data here. Nothing in this module returns an error for
//! an illegal board; the turn engine reads the verdict and rolls back.

pub mod validity;
pub mod generator;
pub mod applier;
pub mod engine;

pub use engine::{GameResult, RulesEngine, StandardRules};
pub use validity::{
    board_verdict, check_board, check_group, check_run, classify, fix, BoardRejection,
    Classification, MeldCheck,
};
