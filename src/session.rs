//! Line-oriented command driver over a [`Position`]. It reads commands from
//! any [`BufRead`] and writes replies to any [`Write`], so the same loop serves
//! the interactive binary and tests with in-memory buffers.
//!
//! Supported commands:
//!
//! - `position startpos [moves <move1> ... <move_i>]`
//! - `position fen <fenstring> [moves <move1> ... <move_i>]`
//! - `move <move1> ... <move_i>`
//! - `fen`: prints the current position in FEN.
//! - `d`: prints the board diagram and position details.
//! - `bitboard`: prints the occupied squares grid.
//! - `quit`
//!
//! Moves are either UCI (`e2e4`) or SAN pawn moves (`e4`, `exd5`). Invalid
//! input never ends the session: it is reported as `info string ...` and the
//! current position stays unchanged.

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{debug, warn};

use crate::chess::notation;
use crate::chess::position::Position;

/// Owns the I/O streams and the current position.
pub struct Session<R: BufRead, W: Write> {
    position: Position,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Creates a new session with the starting position.
    #[must_use]
    pub fn new(input: R, output: W) -> Self {
        Self::with_position(Position::starting(), input, output)
    }

    /// Creates a new session starting from the given position.
    #[must_use]
    pub const fn with_position(position: Position, input: R, output: W) -> Self {
        Self {
            position,
            input,
            output,
        }
    }

    /// The current position.
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Reads the input line by line and executes the commands until `quit`
    /// is received or the input is exhausted.
    ///
    /// # Errors
    ///
    /// Only I/O failures end the loop with an error.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            if self
                .input
                .read_line(&mut line)
                .context("reading session input")?
                == 0
            {
                break;
            }
            let command = Command::parse(&line);
            debug!(?command, "session command");
            match command {
                Command::SetPosition { fen, moves } => self.handle_position(fen, &moves)?,
                Command::Move(moves) => self.handle_moves(&moves)?,
                Command::Fen => writeln!(self.output, "{}", self.position)?,
                Command::Display => write!(self.output, "{:?}", self.position)?,
                Command::Bitboard => write!(self.output, "{}", self.position.occupancy().render())?,
                Command::Quit => break,
                Command::Empty => {},
                Command::Unknown(command) => {
                    writeln!(self.output, "info string Unsupported command: {command}")?;
                },
            }
            self.output.flush()?;
        }
        Ok(())
    }

    /// Replaces the position with the one specified in the command. Nothing
    /// changes if the FEN or any of the moves is malformed.
    fn handle_position(&mut self, fen: Option<String>, moves: &[String]) -> anyhow::Result<()> {
        let position = match fen {
            None => Position::starting(),
            Some(fen) => match Position::from_fen(&fen) {
                Ok(position) => position,
                Err(e) => {
                    warn!(%e, "rejected position command");
                    writeln!(self.output, "info string {e}")?;
                    return Ok(());
                },
            },
        };
        self.play_from(position, moves)
    }

    fn handle_moves(&mut self, moves: &[String]) -> anyhow::Result<()> {
        self.play_from(self.position, moves)
    }

    fn play_from(&mut self, position: Position, moves: &[String]) -> anyhow::Result<()> {
        let moves: Vec<&str> = moves.iter().map(String::as_str).collect();
        match notation::play(&position, &moves) {
            Ok(position) => self.position = position,
            Err(e) => {
                warn!(%e, "rejected moves");
                writeln!(self.output, "info string {e}")?;
            },
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    SetPosition {
        fen: Option<String>,
        moves: Vec<String>,
    },
    Move(Vec<String>),
    Fen,
    Display,
    Bitboard,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    fn parse(input: &str) -> Self {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [] => Self::Empty,
            ["position", rest @ ..] => parse_position(rest, input),
            ["move", moves @ ..] if !moves.is_empty() => {
                Self::Move(moves.iter().map(ToString::to_string).collect())
            },
            ["fen"] => Self::Fen,
            ["d"] => Self::Display,
            ["bitboard"] => Self::Bitboard,
            ["quit"] => Self::Quit,
            _ => Self::Unknown(input.trim().to_string()),
        }
    }
}

fn parse_position(parts: &[&str], input: &str) -> Command {
    let moves_index = parts.iter().position(|&part| part == "moves");
    let (setup, moves) = match moves_index {
        Some(index) => (&parts[..index], &parts[index + 1..]),
        None => (parts, &[][..]),
    };
    let fen = match setup {
        ["startpos"] => None,
        ["fen", fen @ ..] if !fen.is_empty() => Some(fen.join(" ")),
        _ => return Command::Unknown(input.trim().to_string()),
    };
    Command::SetPosition {
        fen,
        moves: moves.iter().map(ToString::to_string).collect(),
    }
}
