//! The fixed geometry of a chess board and the pieces that stand on it
//!
//! Nothing in this crate knows how pieces move. It provides squares, sets of squares, coloured
//! pieces and placements of those pieces, which the `rules` crate builds upon.

use core::fmt;

mod bitboard;
mod placement;
mod square;
mod square_map;

pub use crate::bitboard::{Bitboard, Squares};
pub use crate::placement::Board;
pub use crate::square::{File, Rank, Square};
pub use crate::square_map::SquareMap;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Rejected attempts to construct board values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("square index {0} is outside 0..64")]
    InvalidSquareIndex(u8),
    #[error("file index {0} is outside 0..8")]
    InvalidFile(u8),
    #[error("rank index {0} is outside 0..8")]
    InvalidRank(u8),
    #[error("`{0}` does not name a square")]
    InvalidSquareName(String),
    #[error("`{0}` is not a piece letter")]
    InvalidPieceLetter(char),
    #[error("a placement needs 64 squares, but {0} were given")]
    MalformedPlacement(usize),
}

/// The types of pieces there are
///
/// The order matters: move outcome descriptors are indexed by these ordinals.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// The number of piece kinds
    pub const COUNT: usize = 6;

    /// The kinds a pawn may promote into, in ascending ordinal order
    pub const PROMOTIONS: [PieceKind; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Parse an uppercase or lowercase piece letter
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Self::Pawn),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    /// Whether a pawn can promote into this kind of piece
    pub const fn is_promotable(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::King => false,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Knight | PieceKind::Bishop => true,
        }
    }

    /// Whether this piece slides along lines, and so can pin
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::KINDS[index])
        } else {
            None
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn is_black(self) -> bool {
        match self {
            Color::White => false,
            Color::Black => true,
        }
    }

    pub const fn is_white(self) -> bool {
        match self {
            Color::White => true,
            Color::Black => false,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// The letter used for this color in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// A piece of a particular color
///
/// There are exactly twelve of these; each has a dense index in `0..12` ordered by kind and then
/// color, so the white and black versions of a kind are neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}
impl Piece {
    /// The number of distinct colored pieces
    pub const COUNT: usize = 12;

    pub const WHITE_PAWN: Self = Self::new(PieceKind::Pawn, Color::White);
    pub const BLACK_PAWN: Self = Self::new(PieceKind::Pawn, Color::Black);
    pub const WHITE_KNIGHT: Self = Self::new(PieceKind::Knight, Color::White);
    pub const BLACK_KNIGHT: Self = Self::new(PieceKind::Knight, Color::Black);
    pub const WHITE_BISHOP: Self = Self::new(PieceKind::Bishop, Color::White);
    pub const BLACK_BISHOP: Self = Self::new(PieceKind::Bishop, Color::Black);
    pub const WHITE_ROOK: Self = Self::new(PieceKind::Rook, Color::White);
    pub const BLACK_ROOK: Self = Self::new(PieceKind::Rook, Color::Black);
    pub const WHITE_QUEEN: Self = Self::new(PieceKind::Queen, Color::White);
    pub const BLACK_QUEEN: Self = Self::new(PieceKind::Queen, Color::Black);
    pub const WHITE_KING: Self = Self::new(PieceKind::King, Color::White);
    pub const BLACK_KING: Self = Self::new(PieceKind::King, Color::Black);

    /// Every piece, in index order
    pub const ALL: [Piece; 12] = [
        Self::WHITE_PAWN,
        Self::BLACK_PAWN,
        Self::WHITE_KNIGHT,
        Self::BLACK_KNIGHT,
        Self::WHITE_BISHOP,
        Self::BLACK_BISHOP,
        Self::WHITE_ROOK,
        Self::BLACK_ROOK,
        Self::WHITE_QUEEN,
        Self::BLACK_QUEEN,
        Self::WHITE_KING,
        Self::BLACK_KING,
    ];

    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// The dense index of this piece
    ///
    /// ```
    /// use board::Piece;
    /// for (idx, piece) in Piece::ALL.iter().enumerate() {
    ///     assert_eq!(piece.index(), idx);
    /// }
    /// ```
    pub const fn index(self) -> usize {
        self.kind.index() * 2 + self.color.index()
    }

    /// The piece of the same kind but the other color
    pub const fn swapped(self) -> Self {
        Self::ALL[self.index() ^ 1]
    }

    pub const fn fen_letter(self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// Parse a FEN letter, where uppercase is white and lowercase is black
    pub fn from_fen_letter(letter: char) -> Result<Self> {
        let kind = PieceKind::from_letter(letter).ok_or(Error::InvalidPieceLetter(letter))?;
        let color = if letter.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Self { kind, color })
    }

    /// Returns an iterator of all pieces that exist
    pub fn all_pieces() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }
}
impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen_letter())
    }
}
