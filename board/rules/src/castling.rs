use core::fmt;

use board::{Bitboard, Color, File, Piece, PieceKind, Rank, Square};

use crate::Move;

bitflags::bitflags! {
    /// Which castles are still allowed (the king and that rook haven't moved yet)
    ///
    /// The 16 combinations are all valid states. A held right doesn't make the castle legal right
    /// now, as it may be blocked by intervening pieces or checks.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_QUEENSIDE = 0b0000_0001;
        const WHITE_KINGSIDE = 0b0000_0010;
        /// A mask for whether white can castle in either direction
        const WHITE = 0b0000_0011;
        const BLACK_QUEENSIDE = 0b0000_0100;
        const BLACK_KINGSIDE = 0b0000_1000;
        /// A mask for whether black can castle in either direction
        const BLACK = 0b0000_1100;
    }
}

/// For every state, the squares a castling king of each color may land on
const DESTINATIONS: [[Bitboard; 2]; 16] = {
    let mut table = [[Bitboard::empty(); 2]; 16];
    let mut bits = 0;
    while bits < 16 {
        let mut white = Bitboard::empty();
        let mut black = Bitboard::empty();
        if bits & CastlingRights::WHITE_QUEENSIDE.bits() != 0 {
            white = white.with(Square::C1);
        }
        if bits & CastlingRights::WHITE_KINGSIDE.bits() != 0 {
            white = white.with(Square::G1);
        }
        if bits & CastlingRights::BLACK_QUEENSIDE.bits() != 0 {
            black = black.with(Square::C8);
        }
        if bits & CastlingRights::BLACK_KINGSIDE.bits() != 0 {
            black = black.with(Square::G8);
        }
        table[bits as usize] = [white, black];
        bits += 1;
    }
    table
};

impl CastlingRights {
    /// Both rights of the given color
    pub const fn of_color(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE,
            Color::Black => Self::BLACK,
        }
    }

    /// The right tied to a rook starting on the given square, if it is a home corner
    pub const fn of_corner(square: Square) -> Option<Self> {
        match (square.file(), square.rank()) {
            (File::A, Rank::One) => Some(Self::WHITE_QUEENSIDE),
            (File::H, Rank::One) => Some(Self::WHITE_KINGSIDE),
            (File::A, Rank::Eight) => Some(Self::BLACK_QUEENSIDE),
            (File::H, Rank::Eight) => Some(Self::BLACK_KINGSIDE),
            _ => None,
        }
    }

    /// The squares a castling king of the given color may land on while these rights hold
    ///
    /// ```
    /// use board::{Bitboard, Color, Square};
    /// use rules::CastlingRights;
    /// let rights = CastlingRights::WHITE_QUEENSIDE | CastlingRights::BLACK;
    /// assert_eq!(rights.squares_for(Color::White), Bitboard::from(Square::C1));
    /// assert_eq!(rights.squares_for(Color::Black), Bitboard::from(Square::C8) | Square::G8);
    /// ```
    pub const fn squares_for(self, color: Color) -> Bitboard {
        DESTINATIONS[self.bits() as usize][color.index()]
    }

    /// The rights remaining after the given piece makes the given move
    ///
    /// Moving a king gives up both of its color's rights. Moving a rook away from one of its
    /// color's home corners gives up the right for that corner. Anything else returns `self`.
    pub fn after(self, piece: Piece, mv: Move) -> Self {
        if self.is_empty() {
            return self;
        }
        match piece.kind {
            PieceKind::King => self - Self::of_color(piece.color),
            PieceKind::Rook => match Self::of_corner(mv.from()) {
                Some(corner) if Self::of_color(piece.color).contains(corner) => self - corner,
                _ => self,
            },
            _ => self,
        }
    }

    /// The rights remaining after whatever stood on `square` was captured
    ///
    /// A rook taken on its home corner can no longer castle.
    pub fn after_capture_on(self, square: Square) -> Self {
        match Self::of_corner(square) {
            Some(corner) => self - corner,
            None => self,
        }
    }
}
impl Default for CastlingRights {
    fn default() -> Self {
        Self::all()
    }
}
/// Displays in FEN format (like `KQkq`, or `-` when no castle is allowed)
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (right, letter) in [
            (Self::WHITE_KINGSIDE, 'K'),
            (Self::WHITE_QUEENSIDE, 'Q'),
            (Self::BLACK_KINGSIDE, 'k'),
            (Self::BLACK_QUEENSIDE, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
