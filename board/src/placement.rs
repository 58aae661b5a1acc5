use core::fmt;

use crate::{Bitboard, Color, Error, Piece, PieceKind, Rank, Result, Square};

/// A placement of pieces on the 64 squares
///
/// Alongside the square-by-square contents, this keeps one bitboard per colored piece and one per
/// color. Every mutation goes through [`Board::set`], which keeps all three views consistent.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; 64],
    pieces: [Bitboard; Piece::COUNT],
    colors: [Bitboard; 2],
}

impl Board {
    /// A board with no pieces on it
    pub const fn empty() -> Self {
        Self {
            squares: [None; 64],
            pieces: [Bitboard::empty(); Piece::COUNT],
            colors: [Bitboard::empty(); 2],
        }
    }

    /// The placement at the start of a chess game
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for color in Color::BOTH {
            for (file, kind) in crate::File::ALL.into_iter().zip(BACK_RANK) {
                board.set(
                    Square::from_file_rank(file, Rank::home(color)),
                    Some(Piece::new(kind, color)),
                );
                board.set(
                    Square::from_file_rank(file, Rank::pawn_start(color)),
                    Some(Piece::new(PieceKind::Pawn, color)),
                );
            }
        }
        board
    }

    /// Build a board from 64 squares' contents, indexed by square
    ///
    /// ```
    /// use board::{Board, Error, Piece, Square};
    /// let mut squares = [None; 64];
    /// squares[Square::E1.index()] = Some(Piece::WHITE_KING);
    /// let board = Board::from_placement(&squares).unwrap();
    /// assert_eq!(board.get(Square::E1), Some(Piece::WHITE_KING));
    /// assert_eq!(Board::from_placement(&squares[..8]), Err(Error::MalformedPlacement(8)));
    /// ```
    pub fn from_placement(placement: &[Option<Piece>]) -> Result<Self> {
        if placement.len() != Square::COUNT {
            return Err(Error::MalformedPlacement(placement.len()));
        }
        let mut board = Self::empty();
        for (square, piece) in Square::all().zip(placement) {
            board.set(square, *piece);
        }
        Ok(board)
    }

    /// Builder-style version of [`Board::set`]
    pub fn with(mut self, square: Square, piece: Option<Piece>) -> Self {
        self.set(square, piece);
        self
    }

    /// Find the piece, if any, at the given square
    pub const fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Put a piece on (or clear) the given square, returning what was there before
    pub fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        let previous = core::mem::replace(&mut self.squares[square.index()], piece);
        if let Some(old) = previous {
            self.pieces[old.index()] -= square;
            self.colors[old.color.index()] -= square;
        }
        if let Some(new) = piece {
            self.pieces[new.index()] |= square;
            self.colors[new.color.index()] |= square;
        }
        previous
    }

    /// Returns a bitboard of all occupied squares
    pub const fn occupied(&self) -> Bitboard {
        self.colors[0].union(self.colors[1])
    }

    /// The squares occupied by the given color's pieces
    pub const fn occupied_by(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// The squares holding the given piece
    pub const fn squares_of(&self, piece: Piece) -> Bitboard {
        self.pieces[piece.index()]
    }

    /// How many of the given piece are on the board
    pub const fn count(&self, piece: Piece) -> usize {
        self.pieces[piece.index()].len()
    }

    /// The square of the given color's king, if that color has exactly one king
    pub const fn king_square(&self, color: Color) -> Option<Square> {
        self.squares_of(Piece::new(PieceKind::King, color)).only()
    }

    /// The occupied squares and their pieces, in ascending square order
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .iter()
            .filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    /// The contents of every square, indexed by square
    pub const fn placement(&self) -> &[Option<Piece>; 64] {
        &self.squares
    }
}
impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\n{self})")
    }
}
/// Display as eight rows of FEN letters, rank 8 first, with `.` for empty squares
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for rank in Rank::ALL.into_iter().rev() {
            for file in crate::File::ALL {
                match self.get(Square::from_file_rank(file, rank)) {
                    Some(piece) => f.write_char(piece.fen_letter())?,
                    None => f.write_char('.')?,
                }
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}
