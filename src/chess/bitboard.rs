//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. The
//! disadvantage is inefficiency of some operations like "get piece type on
//! given square" (efficiently handled by Square-centric board
//! implementations).
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::{self, Write};
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub, SubAssign};

use itertools::Itertools;

use crate::chess::core::{File, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant
/// bit corresponds to A1, and the most significant bit - to H8.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    /// Adds the square to the set.
    pub fn set(&mut self, square: Square) {
        *self |= Self::from(square);
    }

    /// Removes the square from the set.
    pub fn clear(&mut self, square: Square) {
        *self -= Self::from(square);
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_any(self) -> bool {
        !self.is_empty()
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Draws the set as an 8x8 grid: rank 8 at the top, file A on the left,
    /// `X` for members and a space otherwise.
    ///
    /// ```
    /// use chesspos::chess::bitboard::Bitboard;
    /// use chesspos::chess::core::Square;
    ///
    /// let diagram = Bitboard::from(Square::E4).render();
    /// assert!(diagram.contains("|   |   |   |   | X |   |   |   | 4"));
    /// assert!(diagram.ends_with("  a   b   c   d   e   f   g   h\n"));
    /// ```
    #[must_use]
    pub fn render(self) -> String {
        const SEPARATOR: &str = "+---+---+---+---+---+---+---+---+\n";
        let mut result = String::from(SEPARATOR);
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                let mark = if self.contains(Square::new(file, *rank)) {
                    'X'
                } else {
                    ' '
                };
                result.push_str("| ");
                result.push(mark);
                result.push(' ');
            }
            result.push_str("| ");
            result.push_str(&rank.to_string());
            result.push('\n');
            result.push_str(SEPARATOR);
        }
        result.push_str(&File::ALL.iter().map(|file| format!("  {file} ")).join(""));
        result.truncate(result.trim_end().len());
        result.push('\n');
        result
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format!("{:#066b}", self.bits)
                .chars()
                .rev()
                .take(BOARD_SIZE as usize)
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|chunk| chunk
                    .map(|ch| match ch {
                        '1' => '1',
                        _ => '.',
                    })
                    .join(SQUARE_SEPARATOR))
                .collect::<Vec<String>>()
                .iter()
                .rev()
                .join(LINE_SEPARATOR)
        )
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitor(rhs.bits))
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits.bitor_assign(rhs.bits);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits.bitand(rhs.bits))
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [BitScan] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        // Get the LS1B and consume it from the iterator.
        let next_index = self.bits.trailing_zeros();
        self.bits ^= 1 << next_index;
        Some(Square::ALL[next_index as usize])
    }
}

/// Piece-centric implementation of the chess board: one [`Bitboard`] per
/// [`Piece`] (indexed by [`Piece::index`]) and their union.
///
/// The piece sets are pairwise disjoint and their union is always equal to
/// the occupancy, see [`Board::is_consistent`].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pieces: [Bitboard; Piece::COUNT],
    occupancy: Bitboard,
}

impl Board {
    /// The standard opening array.
    #[must_use]
    pub fn starting() -> Self {
        let mut result = Self::empty();
        for (player, pieces_rank, pawns_rank) in [
            (Player::White, Rank::One, Rank::Two),
            (Player::Black, Rank::Eight, Rank::Seven),
        ] {
            for (file, kind) in File::ALL.into_iter().zip([
                PieceKind::Rook,
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Queen,
                PieceKind::King,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Rook,
            ]) {
                result.put(Piece::new(player, kind), Square::new(file, pieces_rank));
                result.put(
                    Piece::new(player, PieceKind::Pawn),
                    Square::new(file, pawns_rank),
                );
            }
        }
        result
    }

    /// Constructs an empty Board to be filled by the FEN parser.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pieces: [Bitboard::empty(); Piece::COUNT],
            occupancy: Bitboard::empty(),
        }
    }

    /// Squares occupied by any piece.
    #[must_use]
    pub const fn occupancy(&self) -> Bitboard {
        self.occupancy
    }

    /// Squares occupied by the given piece.
    #[must_use]
    pub const fn pieces(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// Places the piece on the square. The square has to be empty.
    pub fn put(&mut self, piece: Piece, square: Square) {
        debug_assert!(
            !self.occupancy.contains(square),
            "{square} is already occupied"
        );
        self.pieces[piece.index()].set(square);
        self.occupancy.set(square);
    }

    /// Removes whatever piece stands on the square.
    pub fn clear(&mut self, square: Square) {
        for bitboard in &mut self.pieces {
            bitboard.clear(square);
        }
        self.occupancy.clear(square);
    }

    /// Returns the piece on the square. Checks the occupancy first and then
    /// each piece set in [`Piece::ALL`] order: the first match wins.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        if !self.occupancy.contains(square) {
            return None;
        }
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces(*piece).contains(square))
    }

    /// Checks that the piece sets are pairwise disjoint and their union is
    /// equal to the occupancy.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut union = Bitboard::empty();
        for bitboard in self.pieces {
            if (union & bitboard).has_any() {
                return false;
            }
            union |= bitboard;
        }
        union == self.occupancy
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::ALL {
                let square = Square::new(file, *rank);
                if let Some(piece) = self.at(square) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if *rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.iter().rev() {
            for file in File::ALL {
                match self.at(Square::new(file, *rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            if *rank != Rank::One {
                write!(f, "{LINE_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{Bitboard, Board};
    use crate::chess::core::{Piece, PieceKind, Player, Square};

    #[test]
    fn set_and_clear() {
        let mut bitboard = Bitboard::empty();
        bitboard.set(Square::E4);
        bitboard.set(Square::E4);
        bitboard.set(Square::A8);
        assert!(bitboard.contains(Square::E4));
        assert!(bitboard.contains(Square::A8));
        assert!(!bitboard.contains(Square::E5));
        assert_eq!(bitboard.count(), 2);

        bitboard.clear(Square::E4);
        bitboard.clear(Square::H1);
        assert!(!bitboard.contains(Square::E4));
        assert_eq!(bitboard, Bitboard::from(Square::A8));

        bitboard.clear(Square::A8);
        assert!(bitboard.is_empty());
        assert!(!bitboard.has_any());
    }

    #[test]
    fn bitboard_iterator() {
        let mut it = Bitboard::from(Square::E1).iter();
        assert_eq!(it.next(), Some(Square::E1));
        assert_eq!(it.next(), None);

        // Least significant bits come first.
        let bitboard = Bitboard::from(Square::H8)
            | Bitboard::from(Square::C1)
            | Bitboard::from(Square::F1)
            | Bitboard::from(Square::A2);
        assert_eq!(
            bitboard.iter().collect::<Vec<_>>(),
            vec![Square::C1, Square::F1, Square::A2, Square::H8]
        );
        assert_eq!(
            format!("{bitboard:?}"),
            ". . . . . . . 1\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             1 . . . . . . .\n\
             . . 1 . . 1 . ."
        );
    }

    #[test]
    fn render() {
        assert_eq!(
            (Bitboard::from(Square::G5) | Bitboard::from(Square::B8)).render(),
            "+---+---+---+---+---+---+---+---+\n\
             |   | X |   |   |   |   |   |   | 8\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 7\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 6\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   | X |   | 5\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 4\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 3\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 2\n\
             +---+---+---+---+---+---+---+---+\n\
             |   |   |   |   |   |   |   |   | 1\n\
             +---+---+---+---+---+---+---+---+\n  \
             a   b   c   d   e   f   g   h\n"
        );
    }

    #[test]
    fn starting_board() {
        let starting_board = Board::starting();
        assert!(starting_board.is_consistent());
        assert_eq!(
            format!("{starting_board:?}"),
            "r n b q k b n r\n\
             p p p p p p p p\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             P P P P P P P P\n\
             R N B Q K B N R"
        );
        assert_eq!(
            starting_board.occupancy(),
            Bitboard::from_bits(0xFFFF_0000_0000_FFFF)
        );
        assert_eq!(
            starting_board.pieces(Piece::new(Player::Black, PieceKind::Queen)),
            Bitboard::from(Square::D8)
        );
        assert_eq!(
            starting_board.to_string(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }

    #[test]
    fn empty_board() {
        let board = Board::empty();
        assert!(board.is_consistent());
        assert_eq!(
            format!("{board:?}"),
            ". . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . ."
        );
        assert_eq!(board.to_string(), "8/8/8/8/8/8/8/8");
        for square in Square::ALL {
            assert_eq!(board.at(square), None);
        }
    }

    #[test]
    fn put_and_clear() {
        let white_rook = Piece::new(Player::White, PieceKind::Rook);
        let mut board = Board::empty();
        board.put(white_rook, Square::A1);
        assert_eq!(board.at(Square::A1), Some(white_rook));
        assert_eq!(board.occupancy(), Bitboard::from(Square::A1));
        assert!(board.is_consistent());

        board.clear(Square::A1);
        assert_eq!(board.at(Square::A1), None);
        assert!(board.occupancy().is_empty());
        assert!(board.is_consistent());
    }
}
