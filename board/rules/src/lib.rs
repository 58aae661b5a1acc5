//! The rules of chess on top of the plain [`board`] types
//!
//! This crate answers "which moves are legal here?" for any placement of pieces, and keeps
//! [`Sequence`]s of positions reached by playing those moves, which can be navigated back and
//! forth, branched and discarded.

mod analysis;
mod castling;
mod constraint;
pub mod fen;
mod legality;
mod move_table;
pub mod notation;
mod outcome;
mod perft;
mod sequence;

pub use crate::analysis::{BoardInfo, Interposition};
pub use crate::castling::CastlingRights;
pub use crate::constraint::MoveConstraint;
pub use crate::legality::{legal_moves, legal_moves_from, Moves, MAX_MOVES};
pub use crate::move_table::{Move, MoveList, Shapes};
pub use crate::notation::NotationError;
pub use crate::outcome::{MoveCode, MoveOutcome, Promotion};
pub use crate::perft::{perft, perft_divide};
pub use crate::sequence::{Played, Position, PositionId, PositionState, Sequence};

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Board(#[from] board::Error),
    #[error("move ordinal {0} is outside 0..4096")]
    InvalidMoveOrdinal(u16),
    #[error("{0:#x} is not a valid move code")]
    InvalidMoveCode(u32),
    #[error("{0} is not legal in this position")]
    IllegalMove(String),
    #[error("{0} matches more than one legal move")]
    AmbiguousMove(String),
    #[error("an immutable sequence can't be truncated")]
    ImmutableSequence,
    #[error("a sequence must keep at least one position")]
    EmptySequence,
    #[error(transparent)]
    Notation(#[from] NotationError),
}
