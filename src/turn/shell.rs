//! Collaborator seams: who picks the actions, who shows the rack.
//!
//! The turn engine hands an `ActionSource` a numbered list of action
//! descriptions and gets back an index or "done". A `RackRenderer` receives
//! the acting player's tiles at the start of each turn and returns nothing.
//!
//! `TextShell` is the line-oriented implementation of both. Bad input
//! (not a number, or no such move) is answered with a re-prompt inside the
//! shell; the engine only ever sees a valid index or `Done`.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::core::player::PlayerId;
use crate::tiles::Tile;

/// A decision from the acting player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Choice {
    /// Index into the offered action list.
    Index(usize),
    /// End the turn.
    Done,
}

/// Picks actions for the acting player.
pub trait ActionSource {
    /// Choose from `options`, the descriptions of the legal actions in order.
    fn choose(&mut self, player: PlayerId, options: &[String]) -> Choice;
}

impl<F> ActionSource for F
where
    F: FnMut(PlayerId, &[String]) -> Choice,
{
    fn choose(&mut self, player: PlayerId, options: &[String]) -> Choice {
        self(player, options)
    }
}

/// Shows a player's rack.
pub trait RackRenderer {
    fn render(&mut self, player: PlayerId, rack: &[&Tile]);
}

/// Renders nothing.
impl RackRenderer for () {
    fn render(&mut self, _player: PlayerId, _rack: &[&Tile]) {}
}

/// Replays a fixed list of choices, then answers `Done` forever.
#[derive(Clone, Debug, Default)]
pub struct ScriptedSource {
    choices: VecDeque<Choice>,
}

impl ScriptedSource {
    pub fn new(choices: impl IntoIterator<Item = Choice>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
        }
    }

    /// Choices not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl ActionSource for ScriptedSource {
    fn choose(&mut self, _player: PlayerId, _options: &[String]) -> Choice {
        self.choices.pop_front().unwrap_or(Choice::Done)
    }
}

/// Line-oriented shell over any reader and writer.
///
/// ```
/// use std::io::Cursor;
/// use rummikub_engine::core::PlayerId;
/// use rummikub_engine::turn::{ActionSource, Choice, TextShell};
///
/// let mut out = Vec::new();
/// let mut shell = TextShell::new(Cursor::new("x\n7\n1\n"), &mut out);
/// let options = vec!["draw a tile".to_string(), "start a new set with (red, 4)".to_string()];
///
/// assert_eq!(shell.choose(PlayerId::new(0), &options), Choice::Index(1));
/// ```
#[derive(Debug)]
pub struct TextShell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TextShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn prompt(&mut self, player: PlayerId, options: &[String]) -> io::Result<Choice> {
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "{i}: {option}")?;
        }

        let mut line = String::new();
        loop {
            write!(self.output, "{player}, what move would you like to make? ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                // End of input ends the turn
                return Ok(Choice::Done);
            }

            let answer = line.trim();
            if answer.eq_ignore_ascii_case("done") {
                return Ok(Choice::Done);
            }
            match answer.parse::<usize>() {
                Ok(index) if index < options.len() => return Ok(Choice::Index(index)),
                Ok(index) => writeln!(self.output, "There is no move {index}.")?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a valid integer.")?,
            }
        }
    }
}

impl<R: BufRead, W: Write> ActionSource for TextShell<R, W> {
    fn choose(&mut self, player: PlayerId, options: &[String]) -> Choice {
        match self.prompt(player, options) {
            Ok(choice) => choice,
            Err(err) => {
                warn!(%err, "shell i/o failed, ending turn");
                Choice::Done
            }
        }
    }
}

impl<R: BufRead, W: Write> RackRenderer for TextShell<R, W> {
    fn render(&mut self, player: PlayerId, rack: &[&Tile]) {
        let tiles: Vec<String> = rack.iter().map(|t| t.to_string()).collect();
        if let Err(err) = writeln!(self.output, "{player} rack: {}", tiles.join(" ")) {
            warn!(%err, "shell i/o failed while rendering rack");
        }
    }
}
