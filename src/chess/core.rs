//! Chess primitives commonly used within [`crate::chess`]: coordinates,
//! players, pieces, castling rights and the move descriptor.

use std::fmt::{self, Write};
use std::ops::Not;

use itertools::Itertools;

use crate::chess::error::{bail_parse, Error, Result};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use chesspos::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte. The absence of a
/// square (e.g. no en passant target) is expressed as `Option<Square>` which
/// has the same size thanks to the niche optimization.
///
/// ```
/// use chesspos::chess::core::Square;
/// use std::mem;
///
/// assert_eq!(mem::size_of::<Square>(), 1);
/// assert_eq!(mem::size_of::<Option<Square>>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// All squares in index order (A1, B1, ..., H8).
    #[rustfmt::skip]
    pub const ALL: [Self; BOARD_SIZE as usize] = [
        Self::A1, Self::B1, Self::C1, Self::D1, Self::E1, Self::F1, Self::G1, Self::H1,
        Self::A2, Self::B2, Self::C2, Self::D2, Self::E2, Self::F2, Self::G2, Self::H2,
        Self::A3, Self::B3, Self::C3, Self::D3, Self::E3, Self::F3, Self::G3, Self::H3,
        Self::A4, Self::B4, Self::C4, Self::D4, Self::E4, Self::F4, Self::G4, Self::H4,
        Self::A5, Self::B5, Self::C5, Self::D5, Self::E5, Self::F5, Self::G5, Self::H5,
        Self::A6, Self::B6, Self::C6, Self::D6, Self::E6, Self::F6, Self::G6, Self::H6,
        Self::A7, Self::B7, Self::C7, Self::D7, Self::E7, Self::F7, Self::G7, Self::H7,
        Self::A8, Self::B8, Self::C8, Self::D8, Self::E8, Self::F8, Self::G8, Self::H8,
    ];

    /// Connects file (column) and rank (row) to form a full square:
    /// `rank * 8 + file`.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[(file as u8 + (rank as u8) * BOARD_WIDTH) as usize]
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[(self as u8 % BOARD_WIDTH) as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self as u8 / BOARD_WIDTH) as usize]
    }

    /// Returns the neighbouring square in the given direction or `None` if
    /// it would be off the board.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let file = self.file() as u8;
        let rank = self.rank() as u8;
        let (file, rank) = match direction {
            Direction::Up => (Some(file), rank.checked_add(1)),
            Direction::Down => (Some(file), rank.checked_sub(1)),
            Direction::Left => (file.checked_sub(1), Some(rank)),
            Direction::Right => (file.checked_add(1), Some(rank)),
        };
        match (file, rank) {
            (Some(file), Some(rank)) => Some(Self::new(
                File::try_from(file).ok()?,
                Rank::try_from(rank).ok()?,
            )),
            _ => None,
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = Error;

    fn try_from(square: &str) -> Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail_parse!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            )
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// All files from A to H.
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = Error;

    fn try_from(file: char) -> Result<Self> {
        match file {
            'a'..='h' => Ok(Self::ALL[(file as u8 - b'a') as usize]),
            _ => bail_parse!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = Error;

    fn try_from(column: u8) -> Result<Self> {
        match Self::ALL.get(column as usize) {
            Some(file) => Ok(*file),
            None => bail_parse!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// All ranks from One to Eight.
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank a player's pawn lands on after advancing two squares.
    #[must_use]
    pub const fn double_push(player: Player) -> Self {
        match player {
            Player::White => Self::Four,
            Player::Black => Self::Five,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = Error;

    fn try_from(rank: char) -> Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::ALL[(rank as u8 - b'1') as usize]),
            _ => bail_parse!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = Error;

    fn try_from(row: u8) -> Result<Self> {
        match Self::ALL.get(row as usize) {
            Some(rank) => Ok(*rank),
            None => bail_parse!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'1' + *self as u8) as char)
    }
}

/// Directions on the board from a perspective of White player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the eighth rank.
    Up,
    /// Towards the first rank.
    Down,
    /// Towards the A file.
    Left,
    /// Towards the H file.
    Right,
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = Error;

    fn try_from(player: &str) -> Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail_parse!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// All kinds, in the order used for piece lookup.
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    const fn symbol(self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// Represents a specific piece owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    /// Number of distinct (player, kind) combinations.
    pub const COUNT: usize = 12;

    /// All pieces in lookup order: White pawn, knight, bishop, rook, queen,
    /// king, then the same for Black. [`Piece::index`] of each element is its
    /// position in this array.
    pub const ALL: [Self; Self::COUNT] = [
        Self::new(Player::White, PieceKind::Pawn),
        Self::new(Player::White, PieceKind::Knight),
        Self::new(Player::White, PieceKind::Bishop),
        Self::new(Player::White, PieceKind::Rook),
        Self::new(Player::White, PieceKind::Queen),
        Self::new(Player::White, PieceKind::King),
        Self::new(Player::Black, PieceKind::Pawn),
        Self::new(Player::Black, PieceKind::Knight),
        Self::new(Player::Black, PieceKind::Bishop),
        Self::new(Player::Black, PieceKind::Rook),
        Self::new(Player::Black, PieceKind::Queen),
        Self::new(Player::Black, PieceKind::King),
    ];

    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    /// Dense index in 0..[`Piece::COUNT`], used to address per-piece
    /// bitboards.
    #[must_use]
    pub const fn index(self) -> usize {
        self.owner as usize * PieceKind::ALL.len() + self.kind as usize
    }
}

impl TryFrom<char> for Piece {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => bail_parse!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    /// White pieces are uppercase, Black pieces are lowercase.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.symbol();
        f.write_char(match self.owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        })
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// leaves its original corner (or is captured there), player loses
    /// ability to castle its corresponding side.
    ///
    /// The bits are independent and can be combined with `|`:
    ///
    /// ```
    /// use chesspos::chess::core::CastleRights;
    ///
    /// assert_eq!(CastleRights::WHITE_SHORT.bits(), 1);
    /// assert_eq!(CastleRights::WHITE_LONG.bits(), 2);
    /// assert_eq!(CastleRights::BLACK_SHORT.bits(), 4);
    /// assert_eq!(CastleRights::BLACK_LONG.bits(), 8);
    /// assert_eq!(CastleRights::all().to_string(), "KQkq");
    /// ```
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b0001;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0010;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0100;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b1000;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
    }
}

impl CastleRights {
    /// Both rights of the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }

    /// The single right tied to a rook standing on its original corner.
    #[must_use]
    pub const fn for_corner(square: Square) -> Self {
        match square {
            Square::H1 => Self::WHITE_SHORT,
            Square::A1 => Self::WHITE_LONG,
            Square::H8 => Self::BLACK_SHORT,
            Square::A8 => Self::BLACK_LONG,
            _ => Self::empty(),
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = Error;

    /// Parses [`CastleRights`] for both players from the FEN format: either
    /// `-` or a non-empty combination of `K`, `Q`, `k`, `q` in any order.
    /// Repeated letters are harmless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the input is empty, mixes `-` with other
    /// symbols or contains anything other than `KQkq`.
    fn try_from(input: &str) -> Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail_parse!("castling rights can not be empty");
        }
        let mut rights = Self::empty();
        for symbol in input.chars() {
            rights |= match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail_parse!("unknown castle rights: {input}"),
            };
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl TryFrom<char> for Promotion {
    type Error = Error;

    /// Accepts both the UCI (lowercase) and SAN (uppercase) symbols.
    fn try_from(symbol: char) -> Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail_parse!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

/// Classifies how a [`Move`] changes the board beyond relocating the moving
/// piece.
///
/// En passant captures are not tagged: they are recognized by the
/// [`crate::chess::position::Position`] as a pawn landing on its en passant
/// square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Moves the piece (possibly capturing on the target square).
    Normal,
    /// A pawn reaches the last rank and is replaced by another piece.
    Promotion(Promotion),
    /// A king move by two files that also relocates the corresponding rook.
    /// `from` and `to` squares correspond to the king.
    Castling,
}

/// Describes one transition request: a piece moving from one square to
/// another. A move is the only way to mutate
/// [`crate::chess::position::Position`].
///
/// Moves are produced by an external resolver (see
/// [`crate::chess::notation`]) and trusted as-is: the position does not check
/// their legality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    piece: Piece,
    kind: MoveKind,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square, piece: Piece, kind: MoveKind) -> Self {
        Self {
            from,
            to,
            piece,
            kind,
        }
    }

    /// Source square.
    #[must_use]
    pub const fn source(&self) -> Square {
        self.from
    }

    /// Target square.
    #[must_use]
    pub const fn target(&self) -> Square {
        self.to
    }

    /// The piece standing on the source square before the move.
    #[must_use]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// The piece a pawn is promoted to, if any.
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        match self.kind {
            MoveKind::Promotion(promotion) => Some(promotion),
            MoveKind::Normal | MoveKind::Castling => None,
        }
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{}", PieceKind::from(promotion))?;
        }
        Ok(())
    }
}
