//! Turn orchestration.
//!
//! - `engine`: the `TurnEngine` state machine (snapshot, act, commit or roll
//!   back, advance)
//! - `shell`: the `ActionSource` and `RackRenderer` seams, with a scripted
//!   source for tests and a text shell for interactive play

pub mod engine;
pub mod shell;

pub use engine::{TurnEngine, TurnOutcome, TurnPhase, TurnSnapshot};
pub use shell::{ActionSource, Choice, RackRenderer, ScriptedSource, TextShell};
