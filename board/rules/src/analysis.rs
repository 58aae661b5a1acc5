use std::cell::OnceCell;

use board::{Bitboard, Board, Color, Piece, PieceKind, Square, SquareMap};

use crate::{Move, Shapes};

/// A single piece standing between a sliding attacker and its target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interposition {
    /// The attacker's move onto the target, if the square were vacated
    pub mv: Move,
    /// The square between the two
    pub square: Square,
}

impl Move {
    /// Describe a piece on one of this move's intermediate squares
    ///
    /// Returns `None` if `square` isn't strictly between the ends of this move.
    pub fn interpose(self, square: Square) -> Option<Interposition> {
        self.intermediate()
            .has(square)
            .then_some(Interposition { mv: self, square })
    }
}

#[derive(Default)]
struct Pins {
    /// Keyed by the pinning piece
    from: SquareMap<Interposition>,
    /// Keyed by the pinned piece
    through: SquareMap<Interposition>,
}

#[derive(Default)]
struct ColorInfo {
    checks: OnceCell<SquareMap<Move>>,
    pins: OnceCell<Pins>,
}

/// Checks and pins against each color's king on a board
///
/// Everything is computed on first request and cached, so keep one of these around for as long
/// as the board doesn't change. A color without exactly one king is never in check and has
/// nothing pinned.
pub struct BoardInfo<'a> {
    board: &'a Board,
    colors: [ColorInfo; 2],
}

impl<'a> BoardInfo<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            colors: Default::default(),
        }
    }

    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// The moves by which `color`'s opponent is attacking `color`'s king, keyed by the
    /// attacker's square
    pub fn checks(&self, color: Color) -> &SquareMap<Move> {
        self.colors[color.index()].checks.get_or_init(|| {
            let Some(king) = self.board.king_square(color) else {
                return SquareMap::new();
            };
            attacks_on(
                self.board,
                king,
                color.other(),
                self.board.occupied(),
                Bitboard::empty(),
            )
            .map(|mv| (mv.from(), mv))
            .collect()
        })
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        !self.checks(color).is_empty()
    }

    /// Pins against `color`'s king, keyed by the square of the pinning piece
    pub fn pins_to_king(&self, color: Color) -> &SquareMap<Interposition> {
        &self.pins(color).from
    }

    /// Pins against `color`'s king, keyed by the square of the pinned piece
    pub fn pinned_to_king(&self, color: Color) -> &SquareMap<Interposition> {
        &self.pins(color).through
    }

    fn pins(&self, color: Color) -> &Pins {
        self.colors[color.index()].pins.get_or_init(|| {
            let mut pins = Pins::default();
            let Some(king) = self.board.king_square(color) else {
                return pins;
            };
            let own = self.board.occupied_by(color);
            let occupied = self.board.occupied();
            let attacker = color.other();
            for kind in PieceKind::KINDS.into_iter().filter(|kind| kind.is_slider()) {
                let piece = Piece::new(kind, attacker);
                for from in self.board.squares_of(piece) {
                    let mv = Move::between(from, king);
                    if !mv.is_possible_for(piece) {
                        continue;
                    }
                    let Some(square) = (mv.intermediate() & occupied).only() else {
                        continue;
                    };
                    if own.has(square) {
                        let pin = Interposition { mv, square };
                        pins.from.insert(from, pin);
                        pins.through.insert(square, pin);
                    }
                }
            }
            pins
        })
    }
}

/// The moves by which pieces of color `by` attack `target`
///
/// Sliding moves are blocked by `occupied`, which need not match the board so that callers can
/// ask about squares after a move. Pieces standing on `excluded` squares are ignored. Pawns
/// attack only along their capturing shapes and kings never by castling.
pub(crate) fn attacks_on(
    board: &Board,
    target: Square,
    by: Color,
    occupied: Bitboard,
    excluded: Bitboard,
) -> impl Iterator<Item = Move> + '_ {
    let list = Move::possible_to(target);
    let candidates = list.squares() & (board.occupied_by(by) - excluded);
    candidates.iter().filter_map(move |from| {
        let piece = board.get(from)?;
        if !list.squares_for(piece).has(from) {
            return None;
        }
        let mv = list.move_with(from);
        let attacks = match piece.kind {
            PieceKind::Pawn => mv.is_pawn_capture(),
            PieceKind::King => mv.shapes().contains(Shapes::KING),
            _ => occupied.is_disjoint(mv.intermediate()),
        };
        attacks.then_some(mv)
    })
}

pub(crate) fn is_attacked(
    board: &Board,
    target: Square,
    by: Color,
    occupied: Bitboard,
    excluded: Bitboard,
) -> bool {
    attacks_on(board, target, by, occupied, excluded)
        .next()
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fen::parse_placement;

    fn moves(map: &SquareMap<Interposition>) -> Vec<String> {
        map.values().map(|pin| pin.mv.to_string()).collect()
    }

    #[test]
    fn test_pins_to_king() {
        let board = parse_placement("7r/1k2pn1R/8/1r1p4/8/3K1B1q/8/1R6").unwrap();
        let info = BoardInfo::new(&board);
        assert_eq!(moves(info.pins_to_king(Color::White)), vec!["h3-d3"]);
        assert_eq!(
            info.pinned_to_king(Color::White).keys(),
            Bitboard::from(Square::F3)
        );
        let mut black = moves(info.pins_to_king(Color::Black));
        black.sort();
        assert_eq!(black, vec!["b1-b7", "f3-b7"]);
        assert_eq!(
            info.pinned_to_king(Color::Black).keys(),
            Bitboard::from(Square::B5) | Square::D5,
        );
    }

    #[test]
    fn test_checks() {
        let board = parse_placement("8/3kn2Q/4P3/3K4/B7/8/3r4/3r4").unwrap();
        let info = BoardInfo::new(&board);
        let checks = info.checks(Color::White);
        assert_eq!(checks.keys(), Bitboard::from(Square::D2) | Square::E7);
        assert_eq!(
            checks.get(Square::D2),
            Some(&Move::between(Square::D2, Square::D5))
        );
        assert_eq!(
            checks.get(Square::E7),
            Some(&Move::between(Square::E7, Square::D5))
        );
        assert!(info.is_in_check(Color::White));
    }

    #[test]
    fn test_pawn_pushes_do_not_check() {
        // the black pawn on e5 could only push onto the king
        let board = parse_placement("8/8/8/4p3/4K3/8/8/8").unwrap();
        assert!(!BoardInfo::new(&board).is_in_check(Color::White));
        let board = parse_placement("8/8/8/3p4/4K3/8/8/8").unwrap();
        assert!(BoardInfo::new(&board).is_in_check(Color::White));
    }

    #[test]
    fn test_missing_king_has_no_checks() {
        let board = parse_placement("8/8/8/3q4/8/8/8/8").unwrap();
        let info = BoardInfo::new(&board);
        assert!(info.checks(Color::White).is_empty());
        assert!(info.pins_to_king(Color::White).is_empty());
    }

    #[test]
    fn test_interpose() {
        let mv = Move::between(Square::A1, Square::A4);
        assert_eq!(
            mv.interpose(Square::A2),
            Some(Interposition {
                mv,
                square: Square::A2
            })
        );
        assert_eq!(mv.interpose(Square::A4), None);
    }
}
