use core::{fmt, str::FromStr};
use std::sync::OnceLock;

use bitflags::bitflags;
use board::{Bitboard, Color, Piece, PieceKind, Rank, Square};
use log::debug;

use crate::{Error, Result};

bitflags! {
    /// The ways a piece could travel between two squares of an empty board
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Shapes: u16 {
        /// A white pawn's push or capture, including the double step from rank 2
        const WHITE_PAWN = 1 << 0;
        /// A black pawn's push or capture, including the double step from rank 7
        const BLACK_PAWN = 1 << 1;
        /// A pawn shape which changes file
        const PAWN_CAPTURE = 1 << 2;
        /// A pawn shape which lands on the far rank
        const PROMOTION = 1 << 3;
        const KNIGHT = 1 << 4;
        const BISHOP = 1 << 5;
        const ROOK = 1 << 6;
        /// A single step in any direction
        const KING = 1 << 7;
        /// `e1-c1` or `e1-g1`
        const WHITE_CASTLE = 1 << 8;
        /// `e8-c8` or `e8-g8`
        const BLACK_CASTLE = 1 << 9;

        const QUEEN = Self::BISHOP.bits() | Self::ROOK.bits();
        const CASTLE = Self::WHITE_CASTLE.bits() | Self::BLACK_CASTLE.bits();
    }
}

impl Shapes {
    /// The shapes any one of which the given piece can move along
    pub const fn of_piece(piece: Piece) -> Self {
        match (piece.kind, piece.color) {
            (PieceKind::Pawn, Color::White) => Self::WHITE_PAWN,
            (PieceKind::Pawn, Color::Black) => Self::BLACK_PAWN,
            (PieceKind::King, Color::White) => Self::KING.union(Self::WHITE_CASTLE),
            (PieceKind::King, Color::Black) => Self::KING.union(Self::BLACK_CASTLE),
            (kind, _) => Self::of_kind(kind),
        }
    }

    /// The shapes any one of which a piece of the given kind, of either color, can move along
    pub const fn of_kind(kind: PieceKind) -> Self {
        match kind {
            PieceKind::Pawn => Self::WHITE_PAWN.union(Self::BLACK_PAWN),
            PieceKind::Knight => Self::KNIGHT,
            PieceKind::Bishop => Self::BISHOP,
            PieceKind::Rook => Self::ROOK,
            PieceKind::Queen => Self::QUEEN,
            PieceKind::King => Self::KING.union(Self::CASTLE),
        }
    }

    /// Classify the travel from one square to another
    fn between(from: Square, to: Square) -> Self {
        if from == to {
            return Self::empty();
        }
        let df = from.file().difference(to.file());
        let dr = from.rank().difference(to.rank());
        let (adf, adr) = (df.unsigned_abs(), dr.unsigned_abs());

        let white_pawn = (from.rank() != Rank::One && dr == 1 && adf <= 1)
            || (from.rank() == Rank::Two && dr == 2 && df == 0);
        let black_pawn = (from.rank() != Rank::Eight && dr == -1 && adf <= 1)
            || (from.rank() == Rank::Seven && dr == -2 && df == 0);

        let mut shapes = Self::empty();
        shapes.set(Self::WHITE_PAWN, white_pawn);
        shapes.set(Self::BLACK_PAWN, black_pawn);
        shapes.set(Self::PAWN_CAPTURE, (white_pawn || black_pawn) && adf != 0);
        shapes.set(
            Self::PROMOTION,
            (white_pawn && to.rank() == Rank::Eight) || (black_pawn && to.rank() == Rank::One),
        );
        shapes.set(Self::KNIGHT, adf < 3 && adr < 3 && adf + adr == 3);
        shapes.set(Self::BISHOP, adf == adr);
        shapes.set(Self::ROOK, df == 0 || dr == 0);
        shapes.set(Self::KING, adf <= 1 && adr <= 1);
        shapes.set(
            Self::WHITE_CASTLE,
            from == Square::E1 && (to == Square::C1 || to == Square::G1),
        );
        shapes.set(
            Self::BLACK_CASTLE,
            from == Square::E8 && (to == Square::C8 || to == Square::G8),
        );
        shapes
    }
}

/// The travel of a piece from one square to another
///
/// There are exactly 4096 moves, one per ordered pair of squares, identified by the ordinal
/// `from * 64 + to`. Most are impossible for every piece; the ones that are shape-possible carry
/// their [`Shapes`] and the squares strictly between their ends in a table built on first use.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move(u16);

impl Move {
    /// The number of distinct moves
    pub const COUNT: usize = 4096;

    pub const fn between(from: Square, to: Square) -> Self {
        Self((from.index() << 6 | to.index()) as u16)
    }

    /// The move with the given ordinal
    ///
    /// ```
    /// use board::Square;
    /// use rules::Move;
    /// assert_eq!(Move::from_ordinal(12 << 6 | 28), Ok(Move::between(Square::E2, Square::E4)));
    /// assert!(Move::from_ordinal(4096).is_err());
    /// ```
    pub const fn from_ordinal(ordinal: u16) -> Result<Self> {
        if (ordinal as usize) < Self::COUNT {
            Ok(Self(ordinal))
        } else {
            Err(Error::InvalidMoveOrdinal(ordinal))
        }
    }

    /// The move whose ordinal is the low 12 bits of `bits`
    pub(crate) const fn from_low_bits(bits: u16) -> Self {
        Self(bits & 0xFFF)
    }

    pub const fn ordinal(self) -> u16 {
        self.0
    }

    pub const fn from(self) -> Square {
        Square::ALL[(self.0 >> 6) as usize]
    }

    pub const fn to(self) -> Square {
        Square::ALL[(self.0 & 0x3F) as usize]
    }

    /// The move travelling the other way
    pub const fn reverse(self) -> Self {
        Self::between(self.to(), self.from())
    }

    fn entry(self) -> &'static Entry {
        &table().entries[self.0 as usize]
    }

    pub fn shapes(self) -> Shapes {
        self.entry().shapes
    }

    /// The squares strictly between `from` and `to` for sliding shapes
    ///
    /// This is empty for knight and king steps.
    pub fn intermediate(self) -> Bitboard {
        self.entry().intermediate
    }

    /// The intermediate squares along with both ends
    pub fn spanned(self) -> Bitboard {
        self.intermediate() | self.from() | self.to()
    }

    /// Whether some piece could make this move on an empty board
    pub fn is_possible(self) -> bool {
        !self.shapes().is_empty()
    }

    pub fn is_possible_for(self, piece: Piece) -> bool {
        self.shapes().intersects(Shapes::of_piece(piece))
    }

    pub fn is_possible_for_kind(self, kind: PieceKind) -> bool {
        self.shapes().intersects(Shapes::of_kind(kind))
    }

    pub fn is_castling(self) -> bool {
        self.shapes().intersects(Shapes::CASTLE)
    }

    pub fn is_pawn_capture(self) -> bool {
        self.shapes().contains(Shapes::PAWN_CAPTURE)
    }

    pub fn is_promotion(self) -> bool {
        self.shapes().contains(Shapes::PROMOTION)
    }

    /// The square of the pawn an en passant capture along this move would remove
    pub const fn en_passant_square(self) -> Square {
        Square::from_file_rank(self.to().file(), self.from().rank())
    }

    /// The rook's half of a castling move
    ///
    /// ```
    /// use board::Square;
    /// use rules::Move;
    /// assert_eq!(
    ///     Move::between(Square::E1, Square::G1).induced_rook_move(),
    ///     Some(Move::between(Square::H1, Square::F1)),
    /// );
    /// assert_eq!(Move::between(Square::E2, Square::E4).induced_rook_move(), None);
    /// ```
    pub fn induced_rook_move(self) -> Option<Self> {
        if !self.is_castling() {
            return None;
        }
        let rank = self.to().rank();
        let flank = self.to().file().nearest_flank();
        let landing = self.from().file().towards(flank)?;
        Some(Self::between(
            Square::from_file_rank(flank, rank),
            Square::from_file_rank(landing, rank),
        ))
    }

    /// All 4096 moves in ordinal order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u16).map(Self)
    }

    /// The moves some piece could make on an empty board
    pub fn possible() -> impl Iterator<Item = Self> {
        Self::all().filter(|mv| mv.is_possible())
    }

    /// The moves a piece of the given kind could make on an empty board
    pub fn possible_for(kind: PieceKind) -> impl Iterator<Item = Self> {
        Self::all().filter(move |mv| mv.is_possible_for_kind(kind))
    }

    /// The shape-possible moves leaving the given square
    pub fn possible_from(square: Square) -> &'static MoveList {
        &table().from[square.index()]
    }

    /// The shape-possible moves arriving at the given square
    pub fn possible_to(square: Square) -> &'static MoveList {
        &table().to[square.index()]
    }
}
impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}-{})", self.from(), self.to())
    }
}
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from(), self.to())
    }
}
/// Parse `e2-e4` or `e2e4`
impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (from, to) = match s.len() {
            4 => (s.get(..2), s.get(2..)),
            5 if s.get(2..3) == Some("-") => (s.get(..2), s.get(3..)),
            _ => (None, None),
        };
        match (from, to) {
            (Some(from), Some(to)) => Ok(Self::between(from.parse()?, to.parse()?)),
            _ => Err(board::Error::InvalidSquareName(s.to_owned()).into()),
        }
    }
}

/// The shape-possible moves which share one end square
///
/// For the moves leaving a square the other ends are destinations; for the moves arriving at a
/// square they are origins. The per-piece masks let the legality checks filter candidate squares
/// with a single bitwise AND.
#[derive(Clone, Debug)]
pub struct MoveList {
    square: Square,
    arriving: bool,
    squares: Bitboard,
    masks: [Bitboard; Piece::COUNT],
}

impl MoveList {
    fn build(square: Square, arriving: bool, entries: &[Entry]) -> Self {
        let mut list = Self {
            square,
            arriving,
            squares: Bitboard::empty(),
            masks: [Bitboard::empty(); Piece::COUNT],
        };
        for other in Square::all() {
            let shapes = entries[list.move_with(other).0 as usize].shapes;
            if shapes.is_empty() {
                continue;
            }
            list.squares |= other;
            for piece in Piece::all_pieces() {
                if shapes.intersects(Shapes::of_piece(piece)) {
                    list.masks[piece.index()] |= other;
                }
            }
        }
        list
    }

    /// The square every move in this list shares
    pub const fn square(&self) -> Square {
        self.square
    }

    /// The other ends of the moves in this list
    pub const fn squares(&self) -> Bitboard {
        self.squares
    }

    /// The other ends of the moves in this list that the given piece could make
    pub const fn squares_for(&self, piece: Piece) -> Bitboard {
        self.masks[piece.index()]
    }

    /// The move joining this list's square with `other`, in this list's direction
    pub const fn move_with(&self, other: Square) -> Move {
        if self.arriving {
            Move::between(other, self.square)
        } else {
            Move::between(self.square, other)
        }
    }

    pub const fn len(&self) -> usize {
        self.squares.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub const fn contains(&self, mv: Move) -> bool {
        let (shared, other) = if self.arriving {
            (mv.to(), mv.from())
        } else {
            (mv.from(), mv.to())
        };
        shared.index() == self.square.index() && self.squares.has(other)
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.squares.iter().map(|other| self.move_with(other))
    }
}

struct Entry {
    shapes: Shapes,
    intermediate: Bitboard,
}

impl Entry {
    fn build(from: Square, to: Square) -> Self {
        let shapes = Shapes::between(from, to);
        let mut intermediate = Bitboard::empty();
        if shapes.intersects(Shapes::QUEEN) && !shapes.contains(Shapes::KING) {
            let (file_step, rank_step) = (
                from.file().difference(to.file()).signum(),
                from.rank().difference(to.rank()).signum(),
            );
            let mut square = from.offset(rank_step, file_step);
            while let Some(next) = square.filter(|&sq| sq != to) {
                intermediate |= next;
                square = next.offset(rank_step, file_step);
            }
        }
        Self {
            shapes,
            intermediate,
        }
    }
}

struct MoveTable {
    entries: Vec<Entry>,
    from: Vec<MoveList>,
    to: Vec<MoveList>,
}

impl MoveTable {
    fn build() -> Self {
        let entries = Move::all()
            .map(|mv| Entry::build(mv.from(), mv.to()))
            .collect::<Vec<_>>();
        let from = Square::all()
            .map(|square| MoveList::build(square, false, &entries))
            .collect();
        let to = Square::all()
            .map(|square| MoveList::build(square, true, &entries))
            .collect();
        debug!(
            "built move table with {} possible moves",
            entries.iter().filter(|entry| !entry.shapes.is_empty()).count()
        );
        Self { entries, from, to }
    }
}

/// The process-wide move table, built on first use
fn table() -> &'static MoveTable {
    static TABLE: OnceLock<MoveTable> = OnceLock::new();
    TABLE.get_or_init(MoveTable::build)
}
