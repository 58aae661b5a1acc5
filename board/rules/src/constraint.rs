use board::{Bitboard, Color, File, Rank, Square};

use crate::CastlingRights;

/// What, beyond the placement of pieces, decides which moves are legal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveConstraint {
    /// The color whose moves are wanted
    pub to_move: Color,
    /// Where the king of the color to move may land when castling, if the rest of the castle is
    /// legal
    pub castling_squares: Bitboard,
    /// The square a pawn skipped over on the previous move, if any
    pub en_passant: Option<Square>,
}

impl MoveConstraint {
    pub const fn new(to_move: Color, rights: CastlingRights, en_passant_file: Option<File>) -> Self {
        Self {
            to_move,
            castling_squares: rights.squares_for(to_move),
            en_passant: match en_passant_file {
                Some(file) => Some(Square::from_file_rank(file, Rank::en_passant_target(to_move))),
                None => None,
            },
        }
    }

    /// All castles allowed and no en passant capture available
    pub const fn default_for(to_move: Color) -> Self {
        Self::new(to_move, CastlingRights::all(), None)
    }
}
