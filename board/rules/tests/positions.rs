use std::collections::BTreeSet;

use board::{Bitboard, Board, Color, File, Piece, PieceKind, Square};
use rules::{
    fen, legal_moves, legal_moves_from, BoardInfo, CastlingRights, Error, Move, MoveConstraint,
    Moves, Sequence,
};

fn moves_of(text: &str) -> Moves {
    let (board, state) = fen::parse_position(text).unwrap();
    legal_moves(&board, &state.constraint(), Bitboard::FULL)
}

fn names(moves: &Moves) -> BTreeSet<String> {
    moves.iter().map(|code| code.mv().to_string()).collect()
}

fn expected(list: &str) -> BTreeSet<String> {
    list.split(',')
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

fn sans(moves: &Moves) -> BTreeSet<String> {
    moves.iter().filter_map(|code| moves.san(code)).collect()
}

#[test]
fn initial_moves() {
    let moves = moves_of(fen::INITIAL);
    assert_eq!(moves.len(), 20);
    assert!(sans(&moves).iter().all(|san| !san.contains('x')));
}

#[test]
fn pinned_pieces_keep_to_their_line() {
    let board = fen::parse_placement("7r/1k2pn1R/8/1r1p4/8/3K1B1q/8/1R6").unwrap();
    let black = MoveConstraint::default_for(Color::Black);
    let white = MoveConstraint::default_for(Color::White);
    assert_eq!(
        names(&legal_moves_from(&board, &black, Square::B5)),
        expected("b5-b6,b5-b4,b5-b3,b5-b2,b5-b1")
    );
    assert!(legal_moves_from(&board, &white, Square::F3).is_empty());
    assert_eq!(
        names(&legal_moves_from(&board, &black, Square::H3)),
        expected(
            "h3-g3,h3-f3,h3-h2,h3-h1,h3-g2,h3-f1,h3-g4,h3-f5,h3-e6,h3-d7,h3-c8,h3-h4,h3-h5,h3-h6,\
             h3-h7"
        )
    );
}

#[test]
fn checks_on_both_kings() {
    let board = fen::parse_placement("8/3kn2Q/4P3/3K4/B7/8/3r4/3r4").unwrap();
    let info = BoardInfo::new(&board);
    let white: BTreeSet<_> = info.checks(Color::White).values().map(Move::to_string).collect();
    assert_eq!(white, expected("d2-d5,e7-d5"));
    let black: BTreeSet<_> = info.checks(Color::Black).values().map(Move::to_string).collect();
    assert_eq!(black, expected("e6-d7,a4-d7"));
}

#[test]
fn king_escapes_only_to_safe_squares() {
    let board = fen::parse_placement("2K5/1B4N1/4k3/4P2Q/8/8/8/8").unwrap();
    let moves = legal_moves_from(&board, &MoveConstraint::default_for(Color::Black), Square::E6);
    assert_eq!(names(&moves), expected("e6-e7"));
}

#[test]
fn blocking_and_capturing_a_check() {
    let board = fen::parse_placement("8/3k2Q1/8/4qn2/8/3K4/8/8").unwrap();
    let moves = legal_moves(&board, &MoveConstraint::default_for(Color::Black), Bitboard::FULL);
    assert_eq!(
        names(&moves),
        expected("e5-e7,e5-g7,f5-e7,f5-g7,d7-c6,d7-d6,d7-e6,d7-c8,d7-d8,d7-e8")
    );
}

#[test]
fn en_passant_needs_a_target() {
    let board = fen::parse_placement("4k3/8/8/8/pP6/8/8/4K3").unwrap();
    let capture = Move::between(Square::A4, Square::B3);
    let with = MoveConstraint::new(Color::Black, CastlingRights::WHITE, Some(File::B));
    assert!(legal_moves(&board, &with, Bitboard::FULL).contains(capture));
    let without = MoveConstraint::new(Color::Black, CastlingRights::WHITE, None);
    assert!(!legal_moves(&board, &without, Bitboard::FULL).contains(capture));
}

#[test]
fn en_passant_captures_a_checking_pawn() {
    let moves = moves_of("8/8/7p/5ppP/7K/8/7k/8 w - g6 0 1");
    assert_eq!(names(&moves), expected("h5-g6"));
}

#[test]
fn en_passant_blocks_a_check() {
    assert_eq!(
        names(&moves_of("7k/8/5q1K/6pP/8/8/8/8 w - g6 0 1")),
        expected("h5-g6")
    );
    assert!(moves_of("7k/8/5q1K/6pP/8/8/8/8 w - - 0 1").is_empty());
    // the pawn is pinned against the king by the rook
    assert!(moves_of("7k/8/5q1K/6pP/7r/8/8/8 w - g6 0 1").is_empty());
}

#[test]
fn pinned_piece_cannot_answer_check() {
    assert!(moves_of("8/7q/8/4r1NK/8/7k/8/8 w - - 0 1").is_empty());
}

#[test]
fn castling_rights_and_attacks() {
    let board = fen::parse_placement("4k3/8/8/q7/8/r3b3/3PP3/R3Kb1r").unwrap();
    let queenside = Move::between(Square::E1, Square::C1);
    let with = MoveConstraint::new(Color::White, CastlingRights::WHITE_QUEENSIDE, None);
    assert!(legal_moves_from(&board, &with, Square::E1).contains(queenside));
    let without = MoveConstraint::new(Color::White, CastlingRights::empty(), None);
    assert!(!legal_moves_from(&board, &without, Square::E1).contains(queenside));

    // the queen watches f1 but not d1
    let board = fen::parse_placement("8/8/8/2b5/1rq5/2k5/5P2/R3K2R").unwrap();
    let constraint = MoveConstraint::new(Color::White, CastlingRights::WHITE, None);
    let moves = legal_moves_from(&board, &constraint, Square::E1);
    assert!(moves.contains(queenside));
    assert!(!moves.contains(Move::between(Square::E1, Square::G1)));
}

#[test]
fn king_and_rook_beside_each_other() {
    let moves = moves_of("1R6/8/8/8/7P/8/1p1r4/2k1K3 b - - 0 63");
    for name in ["c1-b1", "c1-c2", "d2-d1", "d2-c2"] {
        assert!(names(&moves).contains(name), "{name}");
    }
}

#[test]
fn ambiguous_notation() {
    let sans = sans(&moves_of("6bR/5k2/8/8/8/8/N4p2/KN4bR w - - 0 1"));
    for san in "Nb4,Nac3,Nbc3,Nd2,R8h7,R1h7,R8h6,R1h6,R8h5,R1h5,R8h4,R1h4,Rxg8,Rxg1".split(',') {
        assert!(sans.contains(san), "{san}");
    }
    assert!(!sans.contains("Nc3"));
}

#[test]
fn promotion_notation() {
    let sans = sans(&moves_of("kn6/P6P/8/8/8/b1n5/8/K7 w - - 0 1"));
    assert_eq!(sans.len(), 8);
    assert!(sans.contains("axb8=Q"));
    assert!(sans.contains("h8=R"));
}

#[test]
fn specifier_errors_are_distinct() {
    let mut sequence = Sequence::from_fen("6bR/5k2/8/8/8/8/N4p2/KN4bR w - - 0 1").unwrap();
    let root = sequence.first();
    assert_eq!(
        sequence.make_specified_move(root, "Nc3").unwrap_err(),
        Error::AmbiguousMove("Nc3".to_owned())
    );
    assert_eq!(
        sequence.make_specified_move(root, "Nc4").unwrap_err(),
        Error::IllegalMove("Nc4".to_owned())
    );
    let reached = sequence
        .make_specified_move(root, "Nbc3")
        .unwrap()
        .position();
    assert_eq!(
        sequence.board_at(reached).get(Square::C3),
        Some(Piece::WHITE_KNIGHT)
    );
}

#[test]
fn missing_king_is_tolerated() {
    let board = fen::parse_placement("8/8/8/8/3Q4/8/8/8").unwrap();
    let moves = legal_moves(&board, &MoveConstraint::default_for(Color::White), Bitboard::FULL);
    assert_eq!(moves.len(), 27);
    assert!(moves.iter().all(|code| code.moved() == PieceKind::Queen));
}

#[test]
fn rights_after_ordinary_moves_are_unchanged() {
    let rights = CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE;
    let board = Board::initial();
    for code in &moves_of(fen::INITIAL) {
        let piece = board.get(code.mv().from()).unwrap();
        if piece.kind != PieceKind::King && piece.kind != PieceKind::Rook {
            assert_eq!(rights.after(piece, code.mv()), rights);
        }
    }
}

#[test]
fn fool_s_mate_has_no_moves() {
    let mut sequence = Sequence::default();
    let mut id = sequence.first();
    for specifier in ["f3", "e5", "g4", "Qh4#"] {
        id = sequence.make_specified_move(id, specifier).unwrap().position();
    }
    assert!(sequence.moves(id).is_empty());
    assert!(BoardInfo::new(sequence.board_at(id)).is_in_check(Color::White));
    assert_eq!(
        sequence.fen(id),
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
    );
}

#[test]
fn replaying_from_an_earlier_position() {
    let mut sequence = Sequence::default();
    let first = sequence.first();
    let _ = sequence.make_specified_move(first, "e4").unwrap();
    let (mut continuation, reached) = sequence
        .make_specified_move(first, "d4")
        .unwrap()
        .continuation()
        .unwrap();
    assert_eq!(
        continuation.fen(reached),
        "rnbqkbnr/pppppppp/8/8/3P4/8/PPP1PPPP/RNBQKBNR b KQkq d3 0 1"
    );
    let last = sequence.last();
    assert_eq!(
        sequence.fen(last),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
    );
}
