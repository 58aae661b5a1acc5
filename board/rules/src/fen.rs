//! Forsyth-Edwards Notation for boards and positions

use board::{Board, Color, File, Piece, Rank, Square};

use crate::{CastlingRights, NotationError, PositionState, Result};

/// The starting position of a game
pub const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Read the piece placement field, like `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`
pub fn parse_placement(text: &str) -> Result<Board> {
    let rows: Vec<&str> = text.split('/').collect();
    if rows.len() != 8 {
        return Err(NotationError::RankCount(rows.len()).into());
    }
    let mut board = Board::empty();
    for (row, rank) in rows.into_iter().zip(Rank::ALL.into_iter().rev()) {
        let mut file = 0u8;
        for c in row.chars() {
            if let Some(skip) = c.to_digit(10).filter(|skip| (1..=8).contains(skip)) {
                file += skip as u8;
            } else {
                let piece = Piece::from_fen_letter(c)?;
                let Ok(at) = File::new(file) else {
                    return Err(NotationError::RankLength(rank.digit()).into());
                };
                board.set(Square::from_file_rank(at, rank), Some(piece));
                file += 1;
            }
            if file > 8 {
                return Err(NotationError::RankLength(rank.digit()).into());
            }
        }
        if file != 8 {
            return Err(NotationError::RankLength(rank.digit()).into());
        }
    }
    Ok(board)
}

fn parse_castling(text: &str) -> Result<CastlingRights> {
    if text == "-" {
        return Ok(CastlingRights::empty());
    }
    let mut rights = CastlingRights::empty();
    for c in text.chars() {
        let right = match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => return Err(NotationError::Castling(text.to_owned()).into()),
        };
        if rights.contains(right) {
            return Err(NotationError::Castling(text.to_owned()).into());
        }
        rights |= right;
    }
    if rights.is_empty() {
        return Err(NotationError::Castling(text.to_owned()).into());
    }
    Ok(rights)
}

fn parse_en_passant(text: &str, to_move: Color) -> Result<Option<File>> {
    if text == "-" {
        return Ok(None);
    }
    match text.parse::<Square>() {
        Ok(square) if square.rank() == Rank::en_passant_target(to_move) => Ok(Some(square.file())),
        _ => Err(NotationError::EnPassant(text.to_owned()).into()),
    }
}

fn parse_counter(text: &str) -> Result<u16> {
    text.parse()
        .map_err(|_| NotationError::Counter(text.to_owned()).into())
}

/// Read a full FEN record
///
/// Only the placement is required. Missing fields default to white to move, all castling rights,
/// no en passant square, a halfmove clock of 0 and move number 1.
///
/// ```
/// use board::{Color, File};
/// let (board, state) = rules::fen::parse_position("4k3/8/8/8/pP6/8/8/4K3 b - b3").unwrap();
/// assert_eq!(board.occupied().len(), 4);
/// assert_eq!(state.to_move, Color::Black);
/// assert_eq!(state.en_passant, Some(File::B));
/// assert_eq!(state.move_number, 1);
/// ```
pub fn parse_position(text: &str) -> Result<(Board, PositionState)> {
    let mut fields = text.split_whitespace();
    let board = parse_placement(fields.next().ok_or(NotationError::MissingPlacement)?)?;
    let mut state = PositionState::default();
    if let Some(side) = fields.next() {
        state.to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            _ => return Err(NotationError::SideToMove(side.to_owned()).into()),
        };
    }
    if let Some(castling) = fields.next() {
        state.castling = parse_castling(castling)?;
    }
    if let Some(en_passant) = fields.next() {
        state.en_passant = parse_en_passant(en_passant, state.to_move)?;
    }
    if let Some(clock) = fields.next() {
        state.halfmove_clock = parse_counter(clock)?;
    }
    if let Some(number) = fields.next() {
        state.move_number = parse_counter(number)?;
    }
    let rest: Vec<&str> = fields.collect();
    if !rest.is_empty() {
        return Err(NotationError::TrailingFields(rest.join(" ")).into());
    }
    Ok((board, state))
}

/// Write the piece placement field
pub fn placement_to_string(board: &Board) -> String {
    let mut text = String::new();
    for rank in Rank::ALL.into_iter().rev() {
        let mut empty = 0;
        for file in File::ALL {
            match board.get(Square::from_file_rank(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        text.push_str(&empty.to_string());
                        empty = 0;
                    }
                    text.push(piece.fen_letter());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            text.push_str(&empty.to_string());
        }
        if rank != Rank::One {
            text.push('/');
        }
    }
    text
}

/// Write a full FEN record
pub fn to_string(board: &Board, state: &PositionState) -> String {
    let en_passant = match state.constraint().en_passant {
        Some(square) => square.as_str(),
        None => "-",
    };
    format!(
        "{} {} {} {} {} {}",
        placement_to_string(board),
        state.to_move.fen_letter(),
        state.castling,
        en_passant,
        state.halfmove_clock,
        state.move_number,
    )
}
