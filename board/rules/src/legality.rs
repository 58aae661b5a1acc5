use core::{cell::RefCell, fmt};

use board::{Bitboard, Board, Color, Piece, PieceKind, Square};

use crate::{
    analysis::{is_attacked, BoardInfo},
    notation, Move, MoveCode, MoveConstraint, MoveOutcome, Promotion, Result,
};

/// No position has more legal moves than this
pub const MAX_MOVES: usize = 256;

thread_local! {
    static SCRATCH: RefCell<Vec<MoveCode>> = RefCell::new(Vec::with_capacity(MAX_MOVES));
}

/// The legal moves of a position, grouped by origin square
///
/// A pawn move onto its last rank appears four times, once per [`Promotion`].
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Moves {
    codes: Vec<MoveCode>,
}

impl Moves {
    pub fn codes(&self) -> &[MoveCode] {
        &self.codes
    }

    pub fn iter(&self) -> impl Iterator<Item = MoveCode> + '_ {
        self.codes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Whether any legal move goes between the squares of `mv`
    pub fn contains(&self, mv: Move) -> bool {
        self.iter().any(|code| code.mv() == mv)
    }

    pub fn contains_code(&self, code: MoveCode) -> bool {
        self.codes.contains(&code)
    }

    /// The codes for `mv`, of which there are four for a promotion and at most one otherwise
    pub fn codes_for(&self, mv: Move) -> impl Iterator<Item = MoveCode> + '_ {
        self.iter().filter(move |code| code.mv() == mv)
    }

    pub fn moves_from(&self, square: Square) -> impl Iterator<Item = MoveCode> + '_ {
        self.iter().filter(move |code| code.mv().from() == square)
    }

    /// The squares pieces can move from
    pub fn origins(&self) -> Bitboard {
        self.iter().map(|code| code.mv().from()).collect()
    }

    /// The squares pieces can move to
    pub fn destinations(&self) -> Bitboard {
        self.iter().map(|code| code.mv().to()).collect()
    }

    /// Find the move described by a coordinate (`e2e4`, `e7-e8=Q`) or algebraic (`Nf3`, `O-O`)
    /// specifier
    pub fn find(&self, specifier: &str) -> Result<MoveCode> {
        notation::resolve(self, specifier)
    }

    /// The algebraic notation of one of these moves, or `None` if it isn't among them
    pub fn san(&self, code: MoveCode) -> Option<String> {
        self.contains_code(code)
            .then(|| notation::san(self, code))
    }
}
impl<'a> IntoIterator for &'a Moves {
    type Item = MoveCode;
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, MoveCode>>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter().copied()
    }
}
impl fmt::Debug for Moves {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.codes.iter()).finish()
    }
}

/// The legal moves of pieces standing within `area`
///
/// Only pieces of `constraint.to_move` have moves.
pub fn legal_moves(board: &Board, constraint: &MoveConstraint, area: Bitboard) -> Moves {
    let info = BoardInfo::new(board);
    collect(|codes| {
        for origin in area & board.occupied_by(constraint.to_move) {
            populate(&info, constraint, origin, codes);
        }
    })
}

/// The legal moves of the piece on `square`, if it is one of the color to move
pub fn legal_moves_from(board: &Board, constraint: &MoveConstraint, square: Square) -> Moves {
    legal_moves(board, constraint, Bitboard::from(square))
}

/// Fill a reused per-thread buffer and copy out the result
fn collect(fill: impl FnOnce(&mut Vec<MoveCode>)) -> Moves {
    SCRATCH.with(|scratch| match scratch.try_borrow_mut() {
        Ok(mut codes) => {
            codes.clear();
            fill(&mut codes);
            Moves {
                codes: codes.to_vec(),
            }
        }
        Err(_) => {
            let mut codes = Vec::with_capacity(MAX_MOVES);
            fill(&mut codes);
            Moves { codes }
        }
    })
}

fn populate(
    info: &BoardInfo<'_>,
    constraint: &MoveConstraint,
    origin: Square,
    codes: &mut Vec<MoveCode>,
) {
    let board = info.board();
    let Some(piece) = board.get(origin) else {
        return;
    };
    if piece.color != constraint.to_move {
        return;
    }
    let color = piece.color;
    let occupied = board.occupied();
    let checks = info.checks(color);
    let pin = info.pinned_to_king(color).get(origin).copied();

    if checks.is_empty() || piece.kind == PieceKind::King {
        let list = Move::possible_from(origin);
        for to in list.squares_for(piece) - board.occupied_by(color) {
            let mv = list.move_with(to);
            if occupied.intersects(mv.intermediate()) {
                continue;
            }
            match piece.kind {
                PieceKind::King => {
                    if !king_may_move(board, constraint, !checks.is_empty(), mv) {
                        continue;
                    }
                }
                PieceKind::Pawn if !pawn_may_move(board, constraint, color, mv) => continue,
                _ => {
                    if pin.is_some_and(|pin| !pin.mv.spanned().has(to)) {
                        continue;
                    }
                }
            }
            if exposes_by_en_passant(board, constraint, piece, mv) {
                continue;
            }
            record(codes, board, constraint, piece, mv);
        }
        return;
    }

    // A pinned piece can't leave the pin to block or capture, and only the king can answer two
    // checks at once.
    if pin.is_some() {
        return;
    }
    let Some((checker, &check)) = checks.iter().next().filter(|_| checks.len() == 1) else {
        return;
    };

    for square in check.intermediate() {
        let mv = Move::between(origin, square);
        if !mv.is_possible_for(piece) || occupied.intersects(mv.intermediate()) {
            continue;
        }
        if piece.kind == PieceKind::Pawn && !pawn_may_move(board, constraint, color, mv) {
            continue;
        }
        if exposes_by_en_passant(board, constraint, piece, mv) {
            continue;
        }
        record(codes, board, constraint, piece, mv);
    }

    let capture = Move::between(origin, checker);
    if capture.is_possible_for(piece)
        && occupied.is_disjoint(capture.intermediate())
        && (piece.kind != PieceKind::Pawn || capture.is_pawn_capture())
    {
        record(codes, board, constraint, piece, capture);
    }

    // A pawn which just made a double step and gives check can be taken en passant
    if piece.kind == PieceKind::Pawn {
        if let Some(target) = constraint.en_passant {
            let mv = Move::between(origin, target);
            if mv.en_passant_square() == checker
                && mv.is_possible_for(piece)
                && mv.is_pawn_capture()
                && is_en_passant(board, constraint, piece, mv)
                && !exposes_by_en_passant(board, constraint, piece, mv)
            {
                record(codes, board, constraint, piece, mv);
            }
        }
    }
}

/// Pawns push onto empty squares and capture onto enemy pieces or en passant
fn pawn_may_move(board: &Board, constraint: &MoveConstraint, color: Color, mv: Move) -> bool {
    if mv.is_pawn_capture() {
        board.occupied_by(color.other()).has(mv.to())
            || is_en_passant(board, constraint, Piece::new(PieceKind::Pawn, color), mv)
    } else {
        !board.occupied().has(mv.to())
    }
}

/// Whether `mv` takes a pawn en passant
fn is_en_passant(board: &Board, constraint: &MoveConstraint, piece: Piece, mv: Move) -> bool {
    piece.kind == PieceKind::Pawn
        && mv.is_pawn_capture()
        && constraint.en_passant == Some(mv.to())
        && board.get(mv.to()).is_none()
        && board.get(mv.en_passant_square())
            == Some(Piece::new(PieceKind::Pawn, piece.color.other()))
}

/// Whether an en passant capture leaves the mover's king attacked
///
/// Both pawns leave the same rank at once, so this can uncover attacks a pin doesn't describe.
fn exposes_by_en_passant(
    board: &Board,
    constraint: &MoveConstraint,
    piece: Piece,
    mv: Move,
) -> bool {
    if !is_en_passant(board, constraint, piece, mv) {
        return false;
    }
    let Some(king) = board.king_square(piece.color) else {
        return false;
    };
    let captured = mv.en_passant_square();
    let occupied = (board.occupied() - mv.from() - captured) | mv.to();
    is_attacked(
        board,
        king,
        piece.color.other(),
        occupied,
        Bitboard::from(captured),
    )
}

fn king_may_move(board: &Board, constraint: &MoveConstraint, in_check: bool, mv: Move) -> bool {
    let Some(king) = board.get(mv.from()) else {
        return false;
    };
    let enemy = king.color.other();
    // the king mustn't hide behind itself along the line of an attack
    let occupied = board.occupied() - mv.from();
    if is_attacked(board, mv.to(), enemy, occupied, Bitboard::empty()) {
        return false;
    }
    if !mv.is_castling() {
        return true;
    }
    if in_check || !constraint.castling_squares.has(mv.to()) {
        return false;
    }
    let Some(rook_move) = mv.induced_rook_move() else {
        return false;
    };
    board.get(rook_move.from()) == Some(Piece::new(PieceKind::Rook, king.color))
        && board.occupied().is_disjoint(rook_move.intermediate())
        && !mv
            .intermediate()
            .iter()
            .any(|square| is_attacked(board, square, enemy, occupied, Bitboard::empty()))
}

fn record(
    codes: &mut Vec<MoveCode>,
    board: &Board,
    constraint: &MoveConstraint,
    piece: Piece,
    mv: Move,
) {
    let captured = match board.get(mv.to()) {
        Some(target) => Some(target.kind),
        None if is_en_passant(board, constraint, piece, mv) => Some(PieceKind::Pawn),
        None => None,
    };
    if piece.kind == PieceKind::Pawn && mv.is_promotion() {
        codes.extend(
            Promotion::ALL
                .into_iter()
                .map(|promotion| MoveCode::new(mv, MoveOutcome::promoting(captured, promotion))),
        );
    } else {
        codes.push(MoveCode::new(mv, MoveOutcome::regular(piece.kind, captured)));
    }
}
