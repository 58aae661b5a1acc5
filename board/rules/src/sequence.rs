use core::{
    cell::OnceCell,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use board::{Bitboard, Board, Color, File, Piece, PieceKind};
use log::{debug, trace};

use crate::{
    fen, legal_moves, CastlingRights, Error, Move, MoveCode, MoveConstraint, Moves, Result,
};

/// Everything about a position besides the placement of pieces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionState {
    pub to_move: Color,
    pub castling: CastlingRights,
    /// The file of a pawn which double stepped on the previous move
    pub en_passant: Option<File>,
    /// Starts at 1 and goes up after each of black's moves
    pub move_number: u16,
    /// Half moves since the last pawn move or capture
    pub halfmove_clock: u16,
}

impl PositionState {
    pub const fn constraint(&self) -> MoveConstraint {
        MoveConstraint::new(self.to_move, self.castling, self.en_passant)
    }

    /// The state after the color to move plays `code`
    pub fn after(&self, code: MoveCode) -> Self {
        let mv = code.mv();
        let moved = code.moved();
        let mut castling = self
            .castling
            .after(Piece::new(moved, self.to_move), mv);
        if code.captured().is_some() {
            castling = castling.after_capture_on(mv.to());
        }
        let resets_clock = moved == PieceKind::Pawn || code.captured().is_some();
        Self {
            to_move: self.to_move.other(),
            castling,
            en_passant: (moved == PieceKind::Pawn && !mv.intermediate().is_empty())
                .then(|| mv.from().file()),
            move_number: match self.to_move {
                Color::White => self.move_number,
                Color::Black => self.move_number.saturating_add(1),
            },
            halfmove_clock: if resets_clock {
                0
            } else {
                self.halfmove_clock.saturating_add(1)
            },
        }
    }
}
/// The state of a new game
impl Default for PositionState {
    fn default() -> Self {
        Self {
            to_move: Color::White,
            castling: CastlingRights::all(),
            en_passant: None,
            move_number: 1,
            halfmove_clock: 0,
        }
    }
}

/// One position of a [`Sequence`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub state: PositionState,
    /// The move that led here from the previous position, or `None` for the first position
    pub last_move: Option<MoveCode>,
}

/// A handle on a position within a particular [`Sequence`]
///
/// Handles go stale when their position is discarded, and using a stale handle panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PositionId {
    sequence: u64,
    index: usize,
    serial: u64,
}

impl PositionId {
    /// How many moves into its sequence this position is
    pub const fn index(self) -> usize {
        self.index
    }
}

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_sequence_id() -> u64 {
    NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Clone)]
struct Record {
    serial: u64,
    position: Position,
    moves: OnceCell<Moves>,
}

/// Where a move played by [`Sequence::make_move`] ended up
#[must_use]
#[derive(Debug)]
pub enum Played {
    /// Appended to the sequence the move was played in
    Appended(PositionId),
    /// Played from a position which can't be extended, so it starts a new sequence holding
    /// that position and the one reached
    Continued(Sequence, PositionId),
}

impl Played {
    /// The position reached, which belongs to the continuation if there is one
    pub fn position(&self) -> PositionId {
        match self {
            Self::Appended(id) | Self::Continued(_, id) => *id,
        }
    }

    pub fn continuation(self) -> Option<(Sequence, PositionId)> {
        match self {
            Self::Appended(_) => None,
            Self::Continued(sequence, id) => Some((sequence, id)),
        }
    }
}

/// A line of play: positions each reached from the one before by a single move
///
/// All positions share one mutable board, which is moved back and forth through the line by
/// applying and undoing moves whenever a position's pieces are asked for.
pub struct Sequence {
    id: u64,
    next_serial: u64,
    records: Vec<Record>,
    board: Board,
    /// The position the board currently matches
    cursor: usize,
    /// Whether moves may be appended and positions discarded
    mutable: bool,
}

impl Sequence {
    /// A sequence holding a single position
    pub fn new(board: Board, state: PositionState) -> Self {
        Self {
            id: next_sequence_id(),
            next_serial: 1,
            records: vec![Record {
                serial: 0,
                position: Position {
                    state,
                    last_move: None,
                },
                moves: OnceCell::new(),
            }],
            board,
            cursor: 0,
            mutable: true,
        }
    }

    pub fn from_fen(text: &str) -> Result<Self> {
        let (board, state) = fen::parse_position(text)?;
        Ok(Self::new(board, state))
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// A read-only snapshot of this sequence
    ///
    /// Moves played in the snapshot always continue into new sequences, and it can't be
    /// truncated. Ids of positions in this sequence stay usable on the snapshot for as long as
    /// those positions are kept here.
    pub fn immutable(&self) -> Sequence {
        Self {
            id: self.id,
            next_serial: self.next_serial,
            records: self.records.clone(),
            board: self.board.clone(),
            cursor: self.cursor,
            mutable: false,
        }
    }

    /// A separate sequence with the same positions, which moves can be appended to
    pub fn mutable_copy(&self) -> Sequence {
        Self {
            mutable: true,
            ..self.clone()
        }
    }

    /// Whether `id` names a position currently in this sequence
    pub fn is_live(&self, id: PositionId) -> bool {
        id.sequence == self.id
            && self
                .records
                .get(id.index)
                .is_some_and(|record| record.serial == id.serial)
    }

    fn index_of(&self, id: PositionId) -> usize {
        assert!(
            self.is_live(id),
            "position {id:?} has been discarded or belongs to another sequence"
        );
        id.index
    }

    fn id_at(&self, index: usize) -> PositionId {
        PositionId {
            sequence: self.id,
            index,
            serial: self.records[index].serial,
        }
    }

    /// The number of positions
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false, since a sequence keeps at least one position
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> PositionId {
        self.id_at(0)
    }

    pub fn last(&self) -> PositionId {
        self.id_at(self.records.len() - 1)
    }

    pub fn position_at(&self, index: usize) -> Option<PositionId> {
        (index < self.records.len()).then(|| self.id_at(index))
    }

    pub fn previous(&self, id: PositionId) -> Option<PositionId> {
        let index = self.index_of(id);
        index.checked_sub(1).map(|index| self.id_at(index))
    }

    pub fn next(&self, id: PositionId) -> Option<PositionId> {
        self.position_at(self.index_of(id) + 1)
    }

    /// Every position, first to last
    pub fn positions(&self) -> impl Iterator<Item = PositionId> + '_ {
        (0..self.records.len()).map(|index| self.id_at(index))
    }

    pub fn position(&self, id: PositionId) -> Position {
        self.records[self.index_of(id)].position
    }

    /// The pieces as they stand in the given position
    pub fn board_at(&mut self, id: PositionId) -> &Board {
        self.seek(self.index_of(id));
        &self.board
    }

    /// The legal moves in the given position, computed once and cached
    pub fn moves(&mut self, id: PositionId) -> &Moves {
        let index = self.index_of(id);
        if self.records[index].moves.get().is_none() {
            self.seek(index);
        }
        let record = &self.records[index];
        record.moves.get_or_init(|| {
            legal_moves(
                &self.board,
                &record.position.state.constraint(),
                Bitboard::FULL,
            )
        })
    }

    /// The legal moves in the given position of pieces standing within `area`
    pub fn moves_in(&mut self, id: PositionId, area: Bitboard) -> Moves {
        let index = self.index_of(id);
        self.seek(index);
        let constraint = self.records[index].position.state.constraint();
        legal_moves(&self.board, &constraint, area)
    }

    pub fn fen(&mut self, id: PositionId) -> String {
        let index = self.index_of(id);
        self.seek(index);
        fen::to_string(&self.board, &self.records[index].position.state)
    }

    /// Play a legal move from the given position
    ///
    /// The move is appended when the position is the last of a mutable sequence. Otherwise
    /// this sequence is left alone and the move continues into a new one, as with
    /// [`Self::branch_with_move`].
    pub fn make_move(&mut self, id: PositionId, code: MoveCode) -> Result<Played> {
        let index = self.index_of(id);
        self.check_legal(id, code)?;
        if self.mutable && index + 1 == self.records.len() {
            Ok(Played::Appended(self.append(index, code)))
        } else {
            let mut continuation = self.branch(id);
            let reached = continuation.append(0, code);
            Ok(Played::Continued(continuation, reached))
        }
    }

    fn check_legal(&mut self, id: PositionId, code: MoveCode) -> Result<()> {
        if self.moves(id).contains_code(code) {
            Ok(())
        } else {
            Err(Error::IllegalMove(code.to_string()))
        }
    }

    /// Push the position reached by playing `code` from the last position, at `index`
    fn append(&mut self, index: usize, code: MoveCode) -> PositionId {
        debug_assert_eq!(index + 1, self.records.len());
        self.seek(index);
        let state = self.records[index].position.state;
        apply(&mut self.board, &state, code);
        self.records.push(Record {
            serial: self.next_serial,
            position: Position {
                state: state.after(code),
                last_move: Some(code),
            },
            moves: OnceCell::new(),
        });
        self.next_serial += 1;
        self.cursor = index + 1;
        self.id_at(index + 1)
    }

    /// Play the legal move between the squares of `mv`
    ///
    /// This is ambiguous for promotions, which need [`Self::make_move`] or a specifier naming
    /// the promoted piece.
    pub fn make_move_by(&mut self, id: PositionId, mv: Move) -> Result<Played> {
        let code = {
            let mut codes = self.moves(id).codes_for(mv);
            match (codes.next(), codes.next()) {
                (Some(code), None) => code,
                (None, _) => return Err(Error::IllegalMove(mv.to_string())),
                (Some(_), Some(_)) => return Err(Error::AmbiguousMove(mv.to_string())),
            }
        };
        self.make_move(id, code)
    }

    /// Play the move named by a coordinate or algebraic specifier, like `e2e4` or `Nf3`
    pub fn make_specified_move(&mut self, id: PositionId, specifier: &str) -> Result<Played> {
        let code = self.moves(id).find(specifier)?;
        self.make_move(id, code)
    }

    /// A new, independent sequence starting at the given position
    pub fn branch(&mut self, id: PositionId) -> Sequence {
        let index = self.index_of(id);
        self.seek(index);
        let branch = Sequence {
            id: next_sequence_id(),
            next_serial: 1,
            records: vec![Record {
                serial: 0,
                ..self.records[index].clone()
            }],
            board: self.board.clone(),
            cursor: 0,
            mutable: true,
        };
        debug!(
            "branched sequence {} at position {index} into sequence {}",
            self.id, branch.id
        );
        branch
    }

    /// Branch at the given position and play `code` there, returning the branch and the
    /// position the move reached
    pub fn branch_with_move(
        &mut self,
        id: PositionId,
        code: MoveCode,
    ) -> Result<(Sequence, PositionId)> {
        self.check_legal(id, code)?;
        let mut branch = self.branch(id);
        let reached = branch.append(0, code);
        Ok((branch, reached))
    }

    /// Keep only the first `len` positions
    pub fn truncate(&mut self, len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::EmptySequence);
        }
        if len >= self.records.len() {
            return Ok(());
        }
        if !self.mutable {
            return Err(Error::ImmutableSequence);
        }
        self.seek(self.cursor.min(len - 1));
        debug!(
            "truncating sequence {} from {} to {len} positions",
            self.id,
            self.records.len()
        );
        self.records.truncate(len);
        Ok(())
    }

    /// Discard the given position and every one after it
    pub fn discard(&mut self, id: PositionId) -> Result<()> {
        self.truncate(self.index_of(id))
    }

    /// Bring the board to the given position by applying or undoing moves
    fn seek(&mut self, index: usize) {
        if index != self.cursor {
            trace!(
                "sequence {} moving from position {} to {index}",
                self.id,
                self.cursor
            );
        }
        while self.cursor < index {
            let prior = self.records[self.cursor].position.state;
            self.cursor += 1;
            if let Some(code) = self.records[self.cursor].position.last_move {
                apply(&mut self.board, &prior, code);
            }
        }
        while self.cursor > index {
            let prior = self.records[self.cursor - 1].position.state;
            if let Some(code) = self.records[self.cursor].position.last_move {
                unapply(&mut self.board, &prior, code);
            }
            self.cursor -= 1;
        }
    }
}
impl Default for Sequence {
    fn default() -> Self {
        Self::new(Board::initial(), PositionState::default())
    }
}
/// The clone is a separate sequence, so ids from the original don't work on it
impl Clone for Sequence {
    fn clone(&self) -> Self {
        Self {
            id: next_sequence_id(),
            next_serial: self.next_serial,
            records: self.records.clone(),
            board: self.board.clone(),
            cursor: self.cursor,
            mutable: self.mutable,
        }
    }
}
impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("id", &self.id)
            .field("len", &self.records.len())
            .field("cursor", &self.cursor)
            .field("mutable", &self.mutable)
            .finish_non_exhaustive()
    }
}

/// Whether `code`, played from `prior`, took a pawn en passant
fn is_en_passant(prior: &PositionState, code: MoveCode) -> bool {
    let mv = code.mv();
    code.moved() == PieceKind::Pawn
        && mv.is_pawn_capture()
        && prior.constraint().en_passant == Some(mv.to())
}

/// Change `board` from the position with state `prior` to the one after `code`
fn apply(board: &mut Board, prior: &PositionState, code: MoveCode) {
    let mv = code.mv();
    board.set(mv.from(), None);
    if is_en_passant(prior, code) {
        board.set(mv.en_passant_square(), None);
    }
    if code.moved() == PieceKind::King {
        if let Some(rook) = mv.induced_rook_move() {
            let piece = board.set(rook.from(), None);
            board.set(rook.to(), piece);
        }
    }
    board.set(
        mv.to(),
        Some(Piece::new(code.outcome().placed(), prior.to_move)),
    );
}

/// Undo [`apply`]
fn unapply(board: &mut Board, prior: &PositionState, code: MoveCode) {
    let mv = code.mv();
    let captured = code
        .captured()
        .map(|kind| Piece::new(kind, prior.to_move.other()));
    if is_en_passant(prior, code) {
        board.set(mv.to(), None);
        board.set(mv.en_passant_square(), captured);
    } else {
        board.set(mv.to(), captured);
    }
    if code.moved() == PieceKind::King {
        if let Some(rook) = mv.induced_rook_move() {
            let piece = board.set(rook.to(), None);
            board.set(rook.from(), piece);
        }
    }
    board.set(mv.from(), Some(Piece::new(code.moved(), prior.to_move)));
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::Square;

    use crate::Promotion;

    fn play(sequence: &mut Sequence, specifiers: &[&str]) -> PositionId {
        let mut id = sequence.last();
        for specifier in specifiers {
            id = sequence.make_specified_move(id, specifier).unwrap().position();
        }
        id
    }

    #[test]
    fn test_apply_unapply_round_trip() {
        for text in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/Pp2P3/2N2Q1p/1PPBBPPP/R3K2R b KQkq a3 0 1",
            "1n2k3/P6P/8/8/8/8/8/4K3 w - - 0 1",
            "4k3/8/8/8/pP6/8/8/4K3 b - b3 0 1",
        ] {
            let (board, state) = fen::parse_position(text).unwrap();
            let moves = legal_moves(&board, &state.constraint(), Bitboard::FULL);
            assert!(!moves.is_empty(), "{text}");
            for code in &moves {
                let mut played = board.clone();
                apply(&mut played, &state, code);
                assert_ne!(played, board, "{code}");
                unapply(&mut played, &state, code);
                assert_eq!(played, board, "{text}: {code}");
            }
        }
    }

    #[test]
    fn test_en_passant_removes_pawn() {
        let mut sequence = Sequence::from_fen("4k3/8/8/8/pP6/8/8/4K3 b - b3 0 1").unwrap();
        let id = play(&mut sequence, &["a4xb3"]);
        let board = sequence.board_at(id);
        assert_eq!(board.get(Square::B4), None);
        assert_eq!(board.get(Square::B3), Some(Piece::BLACK_PAWN));
        assert_eq!(sequence.position(id).state.halfmove_clock, 0);
        let first = sequence.first();
        assert_eq!(sequence.board_at(first).get(Square::B4), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn test_castling_moves_rook() {
        let mut sequence = Sequence::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let id = play(&mut sequence, &["O-O", "O-O-O"]);
        let board = sequence.board_at(id);
        assert_eq!(board.get(Square::G1), Some(Piece::WHITE_KING));
        assert_eq!(board.get(Square::F1), Some(Piece::WHITE_ROOK));
        assert_eq!(board.get(Square::H1), None);
        assert_eq!(board.get(Square::C8), Some(Piece::BLACK_KING));
        assert_eq!(board.get(Square::D8), Some(Piece::BLACK_ROOK));
        assert_eq!(board.get(Square::A8), None);
        assert_eq!(sequence.position(id).state.castling, CastlingRights::empty());
        assert_eq!(sequence.fen(id), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
    }

    #[test]
    fn test_state_transitions() {
        let mut sequence = Sequence::default();
        let id = play(&mut sequence, &["e4"]);
        let state = sequence.position(id).state;
        assert_eq!(state.to_move, Color::Black);
        assert_eq!(state.en_passant, Some(File::E));
        assert_eq!(state.move_number, 1);
        let id = play(&mut sequence, &["Nf6", "Nf3"]);
        let state = sequence.position(id).state;
        assert_eq!(state.en_passant, None);
        assert_eq!(state.move_number, 2);
        assert_eq!(state.halfmove_clock, 2);
        assert_eq!(
            sequence.fen(id),
            "rnbqkb1r/pppppppp/5n2/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 2"
        );
    }

    #[test]
    fn test_capture_on_corner_strips_right() {
        let mut sequence = Sequence::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let id = play(&mut sequence, &["Rxa8+"]);
        assert_eq!(
            sequence.position(id).state.castling,
            CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_KINGSIDE
        );
    }

    #[test]
    fn test_promotion_and_unpromotion() {
        let mut sequence = Sequence::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let first = sequence.first();
        let id = sequence
            .make_specified_move(first, "axb8=N")
            .unwrap()
            .position();
        assert_eq!(sequence.board_at(id).get(Square::B8), Some(Piece::WHITE_KNIGHT));
        assert_eq!(
            sequence.position(id).last_move.and_then(|code| code.promotion()),
            Some(Promotion::Knight)
        );
        let board = sequence.board_at(first);
        assert_eq!(board.get(Square::A7), Some(Piece::WHITE_PAWN));
        assert_eq!(board.get(Square::B8), Some(Piece::BLACK_KNIGHT));
    }

    #[test]
    fn test_navigation() {
        let mut sequence = Sequence::default();
        let last = play(&mut sequence, &["e4", "e5", "Nf3"]);
        assert_eq!(sequence.len(), 4);
        assert_eq!(last.index(), 3);
        assert_eq!(sequence.next(last), None);
        let previous = sequence.previous(last).unwrap();
        assert_eq!(sequence.next(previous), Some(last));
        assert_eq!(sequence.previous(sequence.first()), None);
        assert_eq!(sequence.positions().count(), 4);
        assert_eq!(sequence.position_at(4), None);
        let first = sequence.first();
        assert_eq!(sequence.board_at(first), &Board::initial());
        assert_eq!(sequence.moves(previous).len(), 29);
    }

    #[test]
    fn test_errors() {
        let mut sequence = Sequence::default();
        let first = sequence.first();
        let second = play(&mut sequence, &["d4"]);
        assert_eq!(
            sequence
                .make_move_by(second, Move::between(Square::D7, Square::D3))
                .unwrap_err(),
            Error::IllegalMove("d7-d3".to_owned())
        );
        assert_eq!(sequence.truncate(0), Err(Error::EmptySequence));
        assert_eq!(sequence.discard(first), Err(Error::EmptySequence));
        let white_code = sequence.moves(first).iter().next().unwrap();
        assert!(matches!(
            sequence.make_move(second, white_code),
            Err(Error::IllegalMove(_))
        ));
    }

    #[test]
    fn test_discard_makes_ids_stale() {
        let mut sequence = Sequence::default();
        let second = play(&mut sequence, &["e4"]);
        let third = play(&mut sequence, &["e5"]);
        sequence.discard(third).unwrap();
        assert!(sequence.is_live(second));
        assert!(!sequence.is_live(third));
        let replayed = play(&mut sequence, &["c5"]);
        assert_eq!(replayed.index(), third.index());
        assert!(!sequence.is_live(third));
        assert_eq!(sequence.board_at(replayed).get(Square::C5), Some(Piece::BLACK_PAWN));
    }

    #[test]
    #[should_panic(expected = "discarded")]
    fn test_stale_access_panics() {
        let mut sequence = Sequence::default();
        let second = play(&mut sequence, &["e4"]);
        sequence.truncate(1).unwrap();
        sequence.position(second);
    }

    #[test]
    fn test_branches_are_independent() {
        let mut sequence = Sequence::default();
        let second = play(&mut sequence, &["e4"]);
        play(&mut sequence, &["e5"]);
        let mut branch = sequence.branch(second);
        assert_eq!(branch.len(), 1);
        assert!(!branch.is_live(second));
        let reached = branch
            .make_specified_move(branch.first(), "c5")
            .unwrap()
            .position();
        assert_eq!(branch.board_at(reached).get(Square::C5), Some(Piece::BLACK_PAWN));
        let last = sequence.last();
        assert_eq!(sequence.board_at(last).get(Square::C5), None);
        assert_eq!(sequence.board_at(last).get(Square::E5), Some(Piece::BLACK_PAWN));

        let code = sequence.moves(second).find("d5").unwrap();
        let (variation, reached) = sequence.branch_with_move(second, code).unwrap();
        assert_eq!(variation.position(reached).last_move, Some(code));
        assert_eq!(sequence.len(), 3);
    }

    #[test]
    fn test_clone_is_separate() {
        let mut sequence = Sequence::default();
        play(&mut sequence, &["e4"]);
        let mut copy = sequence.clone();
        assert!(!copy.is_live(sequence.last()));
        play(&mut copy, &["e5"]);
        assert_eq!(copy.len(), 3);
        assert_eq!(sequence.len(), 2);
    }

    #[test]
    fn test_move_from_earlier_position_continues() {
        let mut sequence = Sequence::default();
        let first = sequence.first();
        let second = play(&mut sequence, &["e4"]);
        let (mut continuation, reached) = sequence
            .make_specified_move(first, "d4")
            .unwrap()
            .continuation()
            .unwrap();
        assert_eq!(continuation.len(), 2);
        assert_eq!(reached.index(), 1);
        assert!(!continuation.is_live(second));
        let board = continuation.board_at(reached);
        assert_eq!(board.get(Square::D4), Some(Piece::WHITE_PAWN));
        assert_eq!(board.get(Square::E4), None);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.board_at(second).get(Square::E4), Some(Piece::WHITE_PAWN));

        let next = play(&mut continuation, &["d5"]);
        assert_eq!(next.index(), 2);
        assert_eq!(sequence.len(), 2);
    }

    #[test]
    fn test_immutable_snapshot() {
        let mut sequence = Sequence::default();
        let second = play(&mut sequence, &["e4"]);
        let mut snapshot = sequence.immutable();
        assert!(!snapshot.is_mutable());
        assert!(snapshot.is_live(second));
        assert_eq!(snapshot.truncate(1), Err(Error::ImmutableSequence));
        assert_eq!(snapshot.truncate(2), Ok(()));

        let played = snapshot.make_specified_move(second, "e5").unwrap();
        assert!(matches!(played, Played::Continued(..)));
        assert_eq!(snapshot.len(), 2);

        sequence.truncate(1).unwrap();
        let replayed = play(&mut sequence, &["d4"]);
        assert!(!snapshot.is_live(replayed));
        assert_eq!(snapshot.board_at(second).get(Square::E4), Some(Piece::WHITE_PAWN));

        let mut copy = snapshot.mutable_copy();
        assert!(copy.is_mutable());
        assert!(!copy.is_live(second));
        let last = copy.last();
        assert!(matches!(
            copy.make_specified_move(last, "c5"),
            Ok(Played::Appended(_))
        ));
        assert_eq!(copy.len(), 3);
    }
}
