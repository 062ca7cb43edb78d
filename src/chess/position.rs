//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! The only way of mutating a [`Position`] is applying a [`Move`] to it. The
//! position does not verify that the move is legal: that is the job of
//! whoever produced the move.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use tracing::{debug, trace};

use crate::chess::bitboard::{Bitboard, Board};
use crate::chess::core::{
    CastleRights,
    Direction,
    File,
    Move,
    MoveKind,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::chess::error::{Error, Result};

/// Decides when a double pawn push exposes the square it passed over as the en
/// passant target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnPassantMode {
    /// Every double pawn push sets the en passant square, as the FEN standard
    /// prescribes.
    #[default]
    Always,
    /// Only set the en passant square when an opponent's pawn stands right
    /// next to the landing square, i.e. when the capture could be possible on
    /// the next move. Some engines emit FEN this way.
    Capturable,
}

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a truncated version of it: any prefix
/// ending at a field boundary is accepted and the missing fields keep the
/// values of [`Position::empty`].
///
/// Positions have value semantics: they are cheap to copy, and
/// [`Position::apply`] produces an independent state that can be explored
/// without affecting the original.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u16,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use chesspos::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::all(),
            ..Self::empty()
        }
    }

    /// Creates an empty board with White to move, no castling rights, no en
    /// passant square, halfmove clock 0 and fullmove counter 1. This is also
    /// the base the FEN parser fills in.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// The player that makes the next move.
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    /// The square passed over by the most recent double pawn push, if any.
    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    /// Number of half-moves since the last capture or pawn move.
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Starts at 1 and is incremented after each Black move.
    #[must_use]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_counter.get()
    }

    /// Squares occupied by any piece.
    #[must_use]
    pub const fn occupancy(&self) -> Bitboard {
        self.board.occupancy()
    }

    /// Squares occupied by the given piece.
    #[must_use]
    pub const fn pieces(&self, piece: Piece) -> Bitboard {
        self.board.pieces(piece)
    }

    /// Returns the piece standing on the square, if any.
    #[must_use]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    /// Checks that no two piece sets share a square and that their union is
    /// exactly the occupancy. Holds for every position reachable through
    /// [`Position::starting`], [`Position::from_fen`] and
    /// [`Position::make_move`].
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.board.is_consistent()
    }

    /// Parses board from Forsyth-Edwards Notation.
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// Any prefix that ends at a field boundary is accepted: the fields that
    /// are not present keep their [`Position::empty`] values. The piece
    /// placement is strict: there have to be exactly 8 ranks and each of them
    /// has to describe exactly 8 squares. A fullmove counter of 0 is replaced
    /// by 1.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedFen`] if the input can not be interpreted.
    pub fn from_fen(input: &str) -> Result<Self> {
        let result = Self::parse_fen(input);
        if let Err(e) = &result {
            debug!(input, error = %e, "rejected FEN");
        }
        result
    }

    fn parse_fen(input: &str) -> Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            return Err(Error::malformed_fen("missing pieces placement"));
        };
        result.board = parse_placement(pieces_placement)?;
        let Some(side_to_move) = parts.next() else {
            return Ok(result);
        };
        result.side_to_move =
            Player::try_from(side_to_move).map_err(|e| field_error("side to move", &e))?;
        let Some(castling) = parts.next() else {
            return Ok(result);
        };
        result.castling =
            CastleRights::try_from(castling).map_err(|e| field_error("castling rights", &e))?;
        let Some(en_passant_square) = parts.next() else {
            return Ok(result);
        };
        result.en_passant_square = match en_passant_square {
            "-" => None,
            square => Some(
                Square::try_from(square).map_err(|e| field_error("en passant square", &e))?,
            ),
        };
        let Some(halfmove_clock) = parts.next() else {
            return Ok(result);
        };
        result.halfmove_clock = parse_counter(halfmove_clock, "halfmove clock")?;
        let Some(fullmove_counter) = parts.next() else {
            return Ok(result);
        };
        if let Some(counter) = NonZeroU16::new(parse_counter(fullmove_counter, "fullmove counter")?)
        {
            result.fullmove_counter = counter;
        }
        match parts.next() {
            None => Ok(result),
            Some(_) => Err(Error::malformed_fen(format!(
                "trailing symbols are not allowed in FEN: {input}"
            ))),
        }
    }

    /// Serializes the position in Forsyth-Edwards Notation. Same as
    /// `to_string()`.
    #[must_use]
    pub fn fen(&self) -> String {
        self.to_string()
    }

    /// Returns the position after the move, leaving this one intact. See
    /// [`Position::make_move`] for details.
    #[must_use]
    pub fn apply(&self, next_move: &Move) -> Self {
        let mut result = *self;
        result.make_move(next_move);
        result
    }

    /// Same as [`Position::apply`] with explicit en passant square policy.
    #[must_use]
    pub fn apply_with(&self, next_move: &Move, mode: EnPassantMode) -> Self {
        let mut result = *self;
        result.make_move_with(next_move, mode);
        result
    }

    /// Applies the move in place using [`EnPassantMode::Always`].
    ///
    /// The move is trusted: applying an illegal move produces an updated but
    /// illegal position. Passing a move whose source square does not hold
    /// the moving piece of the side to move is a programming error caught by
    /// debug assertions.
    pub fn make_move(&mut self, next_move: &Move) {
        self.make_move_with(next_move, EnPassantMode::default());
    }

    /// Applies the move in place:
    ///
    /// 1. Detects a capture: the target square is occupied.
    /// 2. Clears source and target squares.
    /// 3. Places the moving piece (or the promoted one) on the target square.
    /// 4. Relocates the rook when castling.
    /// 5. Passes the turn to the opponent.
    /// 6. Revokes castling rights affected by king and rook moves and by
    ///    captures on rook corners.
    /// 7. Removes the pawn captured en passant and records the new en passant
    ///    square according to `mode`.
    /// 8. Resets the halfmove clock after pawn moves and captures, increments
    ///    it otherwise.
    /// 9. Increments the fullmove counter after Black moves.
    pub fn make_move_with(&mut self, next_move: &Move, mode: EnPassantMode) {
        let (from, to, piece) = (next_move.source(), next_move.target(), next_move.piece());
        let player = piece.owner;
        debug_assert_eq!(
            self.piece_at(from),
            Some(piece),
            "{next_move}: {from} should hold {piece} in {self}"
        );
        debug_assert_eq!(
            player, self.side_to_move,
            "{next_move}: {piece} does not belong to the side to move in {self}"
        );
        trace!(%next_move, position = %self, "applying move");

        let previous_en_passant = self.en_passant_square;
        let captured = self.piece_at(to);

        self.board.clear(from);
        self.board.clear(to);
        let placed = match next_move.kind() {
            MoveKind::Promotion(promotion) => Piece::new(player, promotion.into()),
            MoveKind::Normal | MoveKind::Castling => piece,
        };
        self.board.put(placed, to);

        if next_move.kind() == MoveKind::Castling {
            self.move_castling_rook(player, to);
        }

        self.side_to_move = !self.side_to_move;

        if piece.kind == PieceKind::King {
            self.castling.remove(CastleRights::both(player));
        }
        if piece.kind == PieceKind::Rook {
            self.castling
                .remove(CastleRights::for_corner(from) & CastleRights::both(player));
        }
        if let Some(captured) = captured {
            if captured.kind == PieceKind::Rook {
                self.castling
                    .remove(CastleRights::for_corner(to) & CastleRights::both(captured.owner));
            }
        }

        let is_en_passant = piece.kind == PieceKind::Pawn
            && previous_en_passant == Some(to)
            && from.file() != to.file();
        if is_en_passant {
            // The captured pawn is right behind the target square.
            if let Some(captured_pawn) = to.shift(player.opponent().push_direction()) {
                debug_assert_eq!(
                    self.piece_at(captured_pawn),
                    Some(Piece::new(player.opponent(), PieceKind::Pawn)),
                    "{next_move}: no pawn to capture en passant on {captured_pawn}"
                );
                self.board.clear(captured_pawn);
            }
        }
        self.en_passant_square = if piece.kind == PieceKind::Pawn && is_double_push(from, to) {
            self.passed_square(player, from, to, mode)
        } else {
            None
        };

        if captured.is_some() || is_en_passant || piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }

        if self.side_to_move == Player::White {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }

        debug_assert!(self.is_consistent(), "{next_move} broke the board: {self:?}");
    }

    /// Moves the rook that accompanies the king in castling: kingside rook
    /// jumps from the H file to the F file, queenside rook from the A file to
    /// the D file.
    fn move_castling_rook(&mut self, player: Player, king_target: Square) {
        let backrank = Rank::backrank(player);
        let (rook_from, rook_to) = if king_target.file() == File::G {
            (File::H, File::F)
        } else {
            (File::A, File::D)
        };
        let (rook_from, rook_to) = (
            Square::new(rook_from, backrank),
            Square::new(rook_to, backrank),
        );
        let rook = Piece::new(player, PieceKind::Rook);
        debug_assert_eq!(
            self.piece_at(rook_from),
            Some(rook),
            "castling rook is missing on {rook_from}"
        );
        self.board.clear(rook_from);
        self.board.put(rook, rook_to);
    }

    /// The square a double-pushed pawn passed over, subject to `mode`.
    fn passed_square(
        &self,
        player: Player,
        from: Square,
        to: Square,
        mode: EnPassantMode,
    ) -> Option<Square> {
        let passed = from.shift(player.push_direction());
        match mode {
            EnPassantMode::Always => passed,
            EnPassantMode::Capturable => {
                let opponent_pawns = self.pieces(Piece::new(player.opponent(), PieceKind::Pawn));
                let capturable = [to.shift(Direction::Left), to.shift(Direction::Right)]
                    .into_iter()
                    .flatten()
                    .any(|square| opponent_pawns.contains(square));
                passed.filter(|_| capturable)
            },
        }
    }
}

fn is_double_push(from: Square, to: Square) -> bool {
    from.file() == to.file() && (from.rank() as u8).abs_diff(to.rank() as u8) == 2
}

fn field_error(field: &str, error: &Error) -> Error {
    Error::malformed_fen(format!("{field}: {error}"))
}

/// Parses the first FEN field. Ranks go from 8 to 1, files within a rank go
/// from A to H.
fn parse_placement(pieces_placement: &str) -> Result<Board> {
    let mut board = Board::empty();
    let ranks: Vec<&str> = pieces_placement.split('/').collect();
    if ranks.len() != BOARD_WIDTH as usize {
        return Err(Error::malformed_fen(format!(
            "expected {BOARD_WIDTH} ranks, got {pieces_placement}"
        )));
    }
    for (rank_fen, rank) in ranks.iter().zip(Rank::ALL.iter().rev()) {
        let mut file: u8 = 0;
        for symbol in rank_fen.chars() {
            match symbol {
                '1'..='8' => {
                    file += symbol as u8 - b'0';
                    if file > BOARD_WIDTH {
                        return Err(Error::malformed_fen(format!(
                            "rank {rank} overflows {BOARD_WIDTH} files: {rank_fen}"
                        )));
                    }
                    continue;
                },
                '0' | '9' => {
                    return Err(Error::malformed_fen(format!(
                        "empty squares increment should be within 1..=8, got {symbol}"
                    )));
                },
                _ => (),
            }
            let piece = Piece::try_from(symbol).map_err(|e| field_error("pieces placement", &e))?;
            let Ok(file_id) = File::try_from(file) else {
                return Err(Error::malformed_fen(format!(
                    "rank {rank} overflows {BOARD_WIDTH} files: {rank_fen}"
                )));
            };
            board.put(piece, Square::new(file_id, *rank));
            file += 1;
        }
        if file != BOARD_WIDTH {
            return Err(Error::malformed_fen(format!(
                "rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}"
            )));
        }
    }
    Ok(board)
}

/// Counters are plain non-negative decimals: no signs, no whitespace.
fn parse_counter(value: &str, field: &str) -> Result<u16> {
    if value.is_empty() || !value.bytes().all(|c| c.is_ascii_digit()) {
        return Err(Error::malformed_fen(format!(
            "{field} can not contain anything other than digits, got '{value}'"
        )));
    }
    value
        .parse::<u16>()
        .map_err(|e| Error::malformed_fen(format!("{field} can not be parsed from {value}: {e}")))
}

impl TryFrom<&str> for Position {
    type Error = Error;

    /// Trims the input and strips an optional `fen ` or `epd ` prefix before
    /// passing it to [`Position::from_fen`].
    fn try_from(input: &str) -> Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {}", &self.to_string())?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Promotion;

    fn setup(fen: &str) -> Position {
        let position = Position::try_from(fen);
        assert!(position.is_ok(), "input: {fen}");
        let position = position.unwrap();
        assert_eq!(position.to_string(), fen);
        assert!(position.is_consistent(), "{}", position.to_string());
        position
    }

    fn piece(symbol: char) -> Piece {
        Piece::try_from(symbol).unwrap()
    }

    fn quiet(position: &Position, from: Square, to: Square) -> Move {
        Move::new(from, to, position.piece_at(from).unwrap(), MoveKind::Normal)
    }

    #[test]
    #[allow(unused_results)]
    fn correct_fen() {
        setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        setup("2r3r1/p3k3/1p3pp1/1B5p/5P2/2P1p1P1/PP4KP/3R4 w - - 0 34");
        setup("rnbqk1nr/p3bppp/1p2p3/2ppP3/3P4/P7/1PP1NPPP/R1BQKBNR w KQkq c6 0 7");
        setup("r2qkb1r/1pp1pp1p/p1np1np1/1B6/3PP1b1/2N1BN2/PPP2PPP/R2QK2R w KQkq - 0 7");
        setup("r3k3/5p2/2p5/p7/P3r3/2N2n2/1PP2P2/2K2B2 w q - 0 24");
        setup("r1b1qrk1/ppp2pbp/n2p1np1/4p1B1/2PPP3/2NB1N1P/PP3PP1/R2QK2R w KQ e6 0 9");
        setup("8/8/8/8/2P5/3k4/8/KB6 b - c3 0 1");
        setup("rnbq1rk1/pp4pp/1b1ppn2/2p2p2/2PP4/1P2PN2/PB2BPPP/RN1Q1RK1 w - c6 0 9");
        setup("8/8/8/8/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn truncated_fen() {
        let full = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Kq e3 12 40";
        let fields: Vec<&str> = full.split(' ').collect();
        for length in 1..=fields.len() {
            let prefix = fields[..length].join(" ");
            let position = Position::from_fen(&prefix);
            assert!(position.is_ok(), "prefix: {prefix}");
        }

        let position = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert_eq!(
            position.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1"
        );
        let position =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Kq e3").unwrap();
        assert_eq!(
            position.fen(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Kq e3 0 1"
        );
        let position =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b Kq e3 12").unwrap();
        assert_eq!(position.halfmove_clock(), 12);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn fullmove_zero_keeps_default() {
        let position = Position::from_fen("8/8/8/8/8/8/8/8 w - - 3 0").unwrap();
        assert_eq!(position.fullmove_number(), 1);
        assert_eq!(position.halfmove_clock(), 3);
    }

    #[test]
    fn castling_field_order() {
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w qkQK - 0 1").unwrap();
        assert_eq!(position.castling(), CastleRights::all());
        assert_eq!(position.fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    }

    #[test]
    fn no_crash() {
        for input in [
            "",
            " ",
            "/",
            "3k2p1N/82/8/8/7B/6K1/3R4/8 b - - 0 1",
            "3kn3/R2p1N2/8/8/70000000000000000B/6K1/3R4/8 b - - 0 1",
            "3kn3/R4N2/8/8/7B/6K1/3R4/8 b - - 0 48 b - - 0 4/8 b",
            "\tfen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23",
            "fen3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 23",
            "3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - +8 1",
            "3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - 8 -1",
            "3kn3/R4N2/8/8/7B/6K1/3r4/8 b - - 99999 1",
            "8/8/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/8/8/8/8 w - - 0 1",
            "9/8/8/8/8/8/8/8 w - - 0 1",
            "08/8/8/8/8/8/8/8 w - - 0 1",
            "pppppppppp/8/8/8/8/8/8/8 w - - 0 1",
            "88888888888888888888888888888888888/8/8/8/8/8/8/8 w - - 0 1",
            "7/8/8/8/8/8/8/8 w - - 0 1",
            "8/8/8/8/8/8/8/8 x - - 0 1",
            "8/8/8/8/8/8/8/8 w KQx - 0 1",
            "8/8/8/8/8/8/8/8 w - e9 0 1",
            "8/8/8/8/8/8/8/8 w - e 0 1",
            "8/8/8/8/8/8/8/8 w  - 0 1",
            "8/8/8/8/8/8/8/8 b 88 \u{1f520} \u{1f520} ",
        ] {
            assert!(Position::try_from(input).is_err(), "input: {input:?}");
        }
    }

    #[test]
    fn malformed_fen_error() {
        assert!(matches!(
            Position::from_fen("8/8/8/8/8/8/8/8 x"),
            Err(Error::MalformedFen { .. })
        ));
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/7 w").unwrap_err().to_string(),
            "malformed FEN: rank size should be exactly 8, got 7 of length 7"
        );
    }

    #[test]
    fn clean_board_str() {
        // Prefix with "fen".
        assert!(Position::try_from(
            "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1"
        )
        .is_ok());
        // Prefix with "epd".
        assert!(Position::try_from(
            "epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -"
        )
        .is_ok());
        // Whitespaces at the start/end of the input are not accepted in from_fen but
        // will be cleaned up by try_from.
        assert!(Position::try_from(
            "rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
        )
        .is_ok());
        assert!(Position::from_fen(
            "\n epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
        )
        .is_err());
    }

    #[test]
    fn empty_position() {
        let position = Position::empty();
        for square in Square::ALL {
            assert_eq!(position.piece_at(square), None);
        }
        assert_eq!(position.fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
        assert!(position.occupancy().is_empty());
    }

    #[test]
    fn piece_lookup() {
        let position = Position::starting();
        assert_eq!(position.piece_at(Square::E1), Some(piece('K')));
        assert_eq!(position.piece_at(Square::D8), Some(piece('q')));
        assert_eq!(position.piece_at(Square::G7), Some(piece('p')));
        assert_eq!(position.piece_at(Square::B1), Some(piece('N')));
        assert_eq!(position.piece_at(Square::E4), None);
    }

    #[test]
    fn double_push() {
        let position = Position::starting();
        let next = position.apply(&quiet(&position, Square::E2, Square::E4));
        assert_eq!(next.side_to_move(), Player::Black);
        assert_eq!(next.en_passant_square(), Some(Square::E3));
        assert_eq!(next.halfmove_clock(), 0);
        assert_eq!(next.fullmove_number(), 1);
        // The original position is not affected.
        assert_eq!(position, Position::starting());

        let next = position.apply_with(
            &quiet(&position, Square::E2, Square::E4),
            EnPassantMode::Capturable,
        );
        assert_eq!(next.en_passant_square(), None);
        assert_eq!(
            next.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
        );
    }

    #[test]
    fn capturable_en_passant_square() {
        let position = setup("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
        let next = position.apply_with(
            &quiet(&position, Square::E2, Square::E4),
            EnPassantMode::Capturable,
        );
        assert_eq!(next.en_passant_square(), Some(Square::E3));
        // A pawn on the other side of the board does not make a difference.
        let position = setup("4k3/8/8/8/p7/8/7P/4K3 w - - 0 1");
        let next = position.apply_with(
            &quiet(&position, Square::H2, Square::H4),
            EnPassantMode::Capturable,
        );
        assert_eq!(next.en_passant_square(), None);
        // Black double push next to a white pawn.
        let position = setup("4k3/2p5/8/1P6/8/8/8/4K3 b - - 0 1");
        let next = position.apply_with(
            &quiet(&position, Square::C7, Square::C5),
            EnPassantMode::Capturable,
        );
        assert_eq!(next.en_passant_square(), Some(Square::C6));
        assert_eq!(next.fullmove_number(), 2);
    }

    #[test]
    fn en_passant_capture() {
        let mut position = setup("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        position.make_move(&quiet(&position, Square::E5, Square::D6));
        assert_eq!(position.piece_at(Square::D5), None);
        assert_eq!(position.piece_at(Square::D6), Some(piece('P')));
        assert!(!position.occupancy().contains(Square::D5));
        assert_eq!(position.en_passant_square(), None);
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn non_pawn_on_en_passant_square() {
        let position = setup("4k3/8/8/3pP3/4N3/8/8/4K3 w - d6 3 1");
        let next = position.apply(&quiet(&position, Square::E4, Square::D6));
        assert_eq!(next.piece_at(Square::D5), Some(piece('p')));
        assert_eq!(next.piece_at(Square::D6), Some(piece('N')));
        assert_eq!(next.en_passant_square(), None);
        assert_eq!(next.halfmove_clock(), 4);
        // Knight captures the pawn that has just been double-pushed.
        let next = position.apply(&quiet(&position, Square::E4, Square::D5));
        assert_eq!(next.halfmove_clock(), 0);
        assert_eq!(next.fen(), "4k3/8/8/3NP3/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn castling() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 5 10");
        let short = Move::new(Square::E1, Square::G1, piece('K'), MoveKind::Castling);
        let next = position.apply(&short);
        assert_eq!(next.fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 6 10");
        let long = Move::new(Square::E8, Square::C8, piece('k'), MoveKind::Castling);
        let next = next.apply(&long);
        assert_eq!(next.fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 7 11");
        assert!(next.is_consistent());
    }

    #[test]
    fn castling_rights_revocation() {
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = position.apply(&quiet(&position, Square::H1, Square::H5));
        assert_eq!(next.castling().to_string(), "Qkq");
        let next = next.apply(&quiet(&next, Square::A8, Square::A7));
        assert_eq!(next.castling().to_string(), "Qk");
        let next = next.apply(&quiet(&next, Square::E1, Square::E2));
        assert_eq!(next.castling().to_string(), "k");

        // Capturing the rook in its corner revokes the right.
        let position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let next = position.apply(&quiet(&position, Square::A1, Square::A8));
        assert_eq!(next.castling().to_string(), "Kk");
        assert_eq!(next.halfmove_clock(), 0);
    }

    #[test]
    fn promotion() {
        let position = setup("1n2k3/P7/8/8/8/8/8/4K3 w - - 7 30");
        let push = Move::new(
            Square::A7,
            Square::A8,
            piece('P'),
            MoveKind::Promotion(Promotion::Queen),
        );
        assert_eq!(position.apply(&push).fen(), "Qn2k3/8/8/8/8/8/8/4K3 b - - 0 30");
        let capture = Move::new(
            Square::A7,
            Square::B8,
            piece('P'),
            MoveKind::Promotion(Promotion::Knight),
        );
        let next = position.apply(&capture);
        assert_eq!(next.fen(), "1N2k3/8/8/8/8/8/8/4K3 b - - 0 30");
        assert_eq!(next.pieces(piece('n')), Bitboard::empty());
    }

    #[test]
    fn clocks() {
        let position = setup("4k3/8/8/8/8/8/8/R3K3 b - - 10 20");
        let next = position.apply(&quiet(&position, Square::E8, Square::D8));
        assert_eq!(next.halfmove_clock(), 11);
        assert_eq!(next.fullmove_number(), 21);
        let next = next.apply(&quiet(&next, Square::A1, Square::A2));
        assert_eq!(next.halfmove_clock(), 12);
        assert_eq!(next.fullmove_number(), 21);
    }
}
