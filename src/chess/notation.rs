//! Resolves textual moves against a [`Position`]: [UCI] long algebraic
//! notation (`e2e4`, `e7e8q`) and the pawn subset of [Standard Algebraic
//! Notation] (`e4`, `exd5`, `e8=Q`).
//!
//! Resolution fills in what the text omits (moving piece, source square of a
//! SAN pawn move, move kind) and rejects moves the board could not take. It
//! does not check legality: checks, pins and piece movement rules are left to
//! the caller.
//!
//! [UCI]: https://www.chessprogramming.org/UCI
//! [Standard Algebraic Notation]: https://www.chessprogramming.org/Algebraic_Chess_Notation#Standard_Algebraic_Notation_.28SAN.29

use itertools::Itertools;

use crate::chess::core::{
    File,
    Move,
    MoveKind,
    Piece,
    PieceKind,
    Promotion,
    Rank,
    Square,
};
use crate::chess::error::{Error, Result};
use crate::chess::position::Position;

impl Move {
    /// Parses a move in UCI format: `<from><to>[promotion]`, where the
    /// optional promotion is one of `q`, `r`, `b`, `n`.
    ///
    /// The moving piece is whatever stands on the source square. A king
    /// moving two files along its rank is castling.
    ///
    /// ```
    /// use chesspos::chess::core::{Move, MoveKind};
    /// use chesspos::chess::position::Position;
    ///
    /// let position = Position::starting();
    /// let next_move = Move::from_uci(&position, "g1f3").unwrap();
    /// assert_eq!(next_move.kind(), MoveKind::Normal);
    /// assert_eq!(next_move.to_string(), "g1f3");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMove`] if the squares can not be parsed, the
    /// source square is empty, a promotion is requested for something other
    /// than a pawn or the move can not be applied to `position` (see
    /// [`Move::from_san`]).
    pub fn from_uci(position: &Position, uci: &str) -> Result<Self> {
        let malformed = |reason: String| Error::malformed_move(uci, reason);
        let symbols: Vec<char> = uci.chars().collect();
        if !(4..=5).contains(&symbols.len()) {
            return Err(malformed(format!(
                "UCI move should be 4 or 5 symbols long, got {}",
                symbols.len()
            )));
        }
        let from = parse_square(symbols[0], symbols[1]).map_err(|e| malformed(e.to_string()))?;
        let to = parse_square(symbols[2], symbols[3]).map_err(|e| malformed(e.to_string()))?;
        let Some(piece) = position.piece_at(from) else {
            return Err(malformed(format!("no piece on {from}")));
        };
        let kind = match symbols.get(4) {
            Some(symbol) => {
                if piece.kind != PieceKind::Pawn {
                    return Err(malformed(format!("only pawns can be promoted, got {piece}")));
                }
                MoveKind::Promotion(
                    Promotion::try_from(*symbol).map_err(|e| malformed(e.to_string()))?,
                )
            },
            None if is_castling(piece, from, to) => MoveKind::Castling,
            None => MoveKind::Normal,
        };
        applicable(position, uci, Self::new(from, to, piece, kind))
    }

    /// Parses a pawn move in SAN: `[file 'x'] file rank ['=' piece]`,
    /// optionally followed by a check (`+`) or mate (`#`) marker.
    ///
    /// The source square is inferred for the side to move: a push comes
    /// from one square behind the target (or two, when the target is on
    /// the double push rank and the square right behind holds no pawn of
    /// the side to move). A capture comes from the given file, one rank
    /// behind the target.
    ///
    /// ```
    /// use chesspos::chess::core::{Move, Square};
    /// use chesspos::chess::position::Position;
    ///
    /// let position = Position::starting();
    /// let next_move = Move::from_san(&position, "e4").unwrap();
    /// assert_eq!(next_move.source(), Square::E2);
    /// assert_eq!(next_move.target(), Square::E4);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedMove`] for piece moves and castling (not
    /// supported), malformed text, a missing or unexpected promotion, or
    /// when there is no pawn of the side to move on the inferred source
    /// square.
    ///
    /// Both notations also reject moves that [`Position::make_move`] can not
    /// apply: a piece of the player not on move, a target occupied by the
    /// mover's own piece, castling without the rook in its corner or through
    /// occupied squares and an en passant capture with no pawn behind the
    /// target.
    pub fn from_san(position: &Position, san: &str) -> Result<Self> {
        let malformed = |reason: String| Error::malformed_move(san, reason);
        let player = position.side_to_move();
        let pawn = Piece::new(player, PieceKind::Pawn);
        let backwards = player.opponent().push_direction();

        let text = san.trim_end_matches(&['+', '#'][..]);
        let symbols: Vec<char> = text.chars().collect();
        if let Some(first) = symbols.first() {
            if first.is_ascii_uppercase() || *first == '0' {
                return Err(malformed("only pawn moves are supported".to_string()));
            }
        }
        let (source_file, rest) = match symbols.as_slice() {
            [file, 'x', rest @ ..] => (Some(*file), rest),
            rest => (None, rest),
        };
        let (target, promotion) = match rest {
            [file, rank] => (parse_square(*file, *rank), None),
            [file, rank, '=', promotion] => (parse_square(*file, *rank), Some(*promotion)),
            _ => {
                return Err(malformed(
                    "expected [file 'x'] file rank ['=' piece]".to_string(),
                ))
            },
        };
        let target = target.map_err(|e| malformed(e.to_string()))?;
        let Some(behind) = target.shift(backwards) else {
            return Err(malformed(format!("no pawn can reach {target}")));
        };

        let from = match source_file {
            Some(file) => {
                let file = File::try_from(file).map_err(|e| malformed(e.to_string()))?;
                if (file as u8).abs_diff(target.file() as u8) != 1 {
                    return Err(malformed(format!(
                        "pawn on file {file} can not capture on {target}"
                    )));
                }
                Square::new(file, behind.rank())
            },
            None if target.rank() == Rank::double_push(player)
                && position.piece_at(behind) != Some(pawn) =>
            {
                behind.shift(backwards).unwrap_or(behind)
            },
            None => behind,
        };
        if position.piece_at(from) != Some(pawn) {
            return Err(malformed(format!("no {player:?} pawn on {from}")));
        }

        let is_last_rank = target.rank() == Rank::backrank(player.opponent());
        let kind = match (promotion, is_last_rank) {
            (Some(symbol), true) => MoveKind::Promotion(
                Promotion::try_from(symbol).map_err(|e| malformed(e.to_string()))?,
            ),
            (None, false) => MoveKind::Normal,
            (None, true) => {
                return Err(malformed(format!(
                    "pawn reaching {target} has to be promoted"
                )))
            },
            (Some(_), false) => {
                return Err(malformed(format!("pawn can not be promoted on {target}")))
            },
        };
        applicable(position, san, Self::new(from, target, pawn, kind))
    }

    /// Accepts either UCI or SAN pawn moves: UCI is recognized by its
    /// leading pair of square coordinates (`e2e4`), everything else is
    /// treated as SAN.
    ///
    /// # Errors
    ///
    /// See [`Move::from_uci`] and [`Move::from_san`].
    pub fn parse(position: &Position, text: &str) -> Result<Self> {
        let looks_like_uci = text
            .chars()
            .take(3)
            .collect_tuple::<(char, char, char)>()
            .is_some_and(|(_, rank, file)| {
                rank.is_ascii_digit() && file.is_ascii_lowercase()
            });
        if looks_like_uci {
            Self::from_uci(position, text)
        } else {
            Self::from_san(position, text)
        }
    }
}

fn parse_square(file: char, rank: char) -> Result<Square> {
    Ok(Square::new(File::try_from(file)?, Rank::try_from(rank)?))
}

fn is_castling(piece: Piece, from: Square, to: Square) -> bool {
    piece.kind == PieceKind::King
        && from.file() == File::E
        && from.rank() == to.rank()
        && from.rank() == Rank::backrank(piece.owner)
        && (from.file() as u8).abs_diff(to.file() as u8) == 2
}

/// Passes `next_move` through if the board satisfies everything
/// [`Position::make_move`] expects from it.
fn applicable(position: &Position, text: &str, next_move: Move) -> Result<Move> {
    let malformed = |reason: String| Error::malformed_move(text, reason);
    let (from, to, piece) = (next_move.source(), next_move.target(), next_move.piece());
    let player = position.side_to_move();
    if piece.owner != player {
        return Err(malformed(format!(
            "{piece} on {from} does not belong to the side to move ({player:?})"
        )));
    }
    if next_move.kind() == MoveKind::Castling {
        let backrank = Rank::backrank(player);
        let (corner, between) = if to.file() == File::G {
            (File::H, &[File::F, File::G][..])
        } else {
            (File::A, &[File::B, File::C, File::D][..])
        };
        let corner = Square::new(corner, backrank);
        if position.piece_at(corner) != Some(Piece::new(player, PieceKind::Rook)) {
            return Err(malformed(format!("no rook to castle with on {corner}")));
        }
        if let Some(blocked) = between
            .iter()
            .map(|file| Square::new(*file, backrank))
            .find(|square| position.piece_at(*square).is_some())
        {
            return Err(malformed(format!("can not castle through {blocked}")));
        }
    }
    if position.piece_at(to).is_some_and(|target| target.owner == player) {
        return Err(malformed(format!("{to} is occupied by {player:?}")));
    }
    let is_en_passant = piece.kind == PieceKind::Pawn
        && from.file() != to.file()
        && position.en_passant_square() == Some(to);
    if is_en_passant {
        let opponent_pawn = Piece::new(player.opponent(), PieceKind::Pawn);
        let victim = to.shift(player.opponent().push_direction());
        if victim.and_then(|square| position.piece_at(square)) != Some(opponent_pawn) {
            return Err(malformed(format!("no pawn to capture en passant on {to}")));
        }
    }
    Ok(next_move)
}

/// Resolves each move (UCI or SAN pawn move) and applies them one by
/// one, starting from `position`.
///
/// # Errors
///
/// Stops at the first move that can not be resolved.
pub fn play(position: &Position, moves: &[&str]) -> Result<Position> {
    let mut result = *position;
    for text in moves {
        let next_move = Move::parse(&result, text)?;
        result.make_move(&next_move);
    }
    Ok(result)
}
