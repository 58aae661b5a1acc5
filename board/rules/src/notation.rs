//! Reading and writing moves as text
//!
//! Moves are written in standard algebraic notation without check suffixes, and read either from
//! that or from coordinates like `e2e4`, `e2-e4` or `e7e8q`.

use board::{File, PieceKind, Rank, Square};

use crate::{Error, MoveCode, Moves, Promotion, Result};

/// Text that couldn't be read as a position or a move
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("FEN has no piece placement")]
    MissingPlacement,
    #[error("FEN placement has {0} ranks instead of 8")]
    RankCount(usize),
    #[error("FEN placement rank {0} doesn't describe exactly 8 squares")]
    RankLength(char),
    #[error("FEN side to move must be `w` or `b`, not `{0}`")]
    SideToMove(String),
    #[error("FEN castling field `{0}` is malformed")]
    Castling(String),
    #[error("FEN en passant field `{0}` is malformed")]
    EnPassant(String),
    #[error("FEN move counter `{0}` is malformed")]
    Counter(String),
    #[error("FEN has unexpected trailing text `{0}`")]
    TrailingFields(String),
    #[error("empty move")]
    EmptyMove,
    #[error("`{0}` doesn't describe a move")]
    UnreadableMove(String),
}

/// The algebraic notation for `code`, disambiguated against the other `moves` of its position
pub(crate) fn san(moves: &Moves, code: MoveCode) -> String {
    let mv = code.mv();
    let mut text = String::new();
    match code.moved() {
        PieceKind::King if mv.is_castling() => {
            return if mv.to().file() == File::G {
                "O-O".to_owned()
            } else {
                "O-O-O".to_owned()
            };
        }
        PieceKind::Pawn => {
            if code.captured().is_some() {
                text.push(mv.from().file().letter());
            }
        }
        kind => {
            text.push(kind.fen_letter());
            let rivals: Vec<Square> = moves
                .iter()
                .filter(|other| {
                    other.moved() == kind && other.mv().to() == mv.to() && other.mv() != mv
                })
                .map(|other| other.mv().from())
                .collect();
            if !rivals.is_empty() {
                let from = mv.from();
                if rivals.iter().all(|rival| rival.file() != from.file()) {
                    text.push(from.file().letter());
                } else if rivals.iter().all(|rival| rival.rank() != from.rank()) {
                    text.push(from.rank().digit());
                } else {
                    text.push_str(from.as_str());
                }
            }
        }
    }
    if code.captured().is_some() {
        text.push('x');
    }
    text.push_str(mv.to().as_str());
    if let Some(promotion) = code.promotion() {
        text.push('=');
        text.push(promotion.kind().fen_letter());
    }
    text
}

/// What a move specifier says about the move it names
#[derive(Default)]
struct Pattern {
    kind: Option<PieceKind>,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to: Option<Square>,
    promotion: Option<Promotion>,
    castle_to: Option<File>,
}

impl Pattern {
    fn matches(&self, code: MoveCode) -> bool {
        let mv = code.mv();
        if let Some(file) = self.castle_to {
            return code.moved() == PieceKind::King && mv.is_castling() && mv.to().file() == file;
        }
        self.kind.map_or(true, |kind| code.moved() == kind)
            && self.from_file.map_or(true, |file| mv.from().file() == file)
            && self.from_rank.map_or(true, |rank| mv.from().rank() == rank)
            && self.to.map_or(true, |to| mv.to() == to)
            && self.promotion.map_or(true, |promotion| code.promotion() == Some(promotion))
    }
}

fn promotion_letter(letter: char) -> Option<Promotion> {
    PieceKind::from_letter(letter).and_then(Promotion::from_kind)
}

fn square_at(chars: &[char]) -> Option<Square> {
    match *chars {
        [file, rank] => Some(Square::from_file_rank(
            File::from_letter(file)?,
            Rank::from_digit(rank)?,
        )),
        _ => None,
    }
}

/// Read `e2e4`, `e2-e4`, `e2xd3` or `e7e8q` style coordinates
fn coordinates(chars: &[char]) -> Option<Pattern> {
    if chars.len() < 4 {
        return None;
    }
    let from = square_at(&chars[..2])?;
    let rest = match chars[2] {
        '-' | 'x' => &chars[3..],
        _ => &chars[2..],
    };
    let to = square_at(rest.get(..2)?)?;
    let promotion = match rest[2..] {
        [] => None,
        ['=', letter] | [letter] => Some(promotion_letter(letter)?),
        _ => return None,
    };
    Some(Pattern {
        from_file: Some(from.file()),
        from_rank: Some(from.rank()),
        to: Some(to),
        promotion,
        ..Pattern::default()
    })
}

/// Read standard algebraic notation, tolerating a missing or extra capture marker
fn algebraic(chars: &[char]) -> Option<Pattern> {
    let mut chars = chars;
    let mut pattern = Pattern::default();
    match chars {
        ['O' | '0', '-', 'O' | '0', '-', 'O' | '0'] => {
            pattern.castle_to = Some(File::C);
            return Some(pattern);
        }
        ['O' | '0', '-', 'O' | '0'] => {
            pattern.castle_to = Some(File::G);
            return Some(pattern);
        }
        _ => {}
    }
    let kind = match chars.first() {
        Some(&letter) if letter.is_ascii_uppercase() => {
            chars = &chars[1..];
            PieceKind::from_letter(letter).filter(|&kind| kind != PieceKind::Pawn)?
        }
        _ => PieceKind::Pawn,
    };
    pattern.kind = Some(kind);
    if kind == PieceKind::Pawn {
        match *chars {
            [ref rest @ .., '=', letter] => {
                pattern.promotion = Some(promotion_letter(letter)?);
                chars = rest;
            }
            [ref rest @ .., _, digit, letter]
                if digit.is_ascii_digit() && letter.is_ascii_alphabetic() =>
            {
                pattern.promotion = Some(promotion_letter(letter)?);
                chars = &chars[..rest.len() + 2];
            }
            _ => {}
        }
    }
    if chars.len() < 2 {
        return None;
    }
    let (disambiguation, destination) = chars.split_at(chars.len() - 2);
    pattern.to = Some(square_at(destination)?);
    let disambiguation = match disambiguation {
        [rest @ .., 'x'] => rest,
        rest => rest,
    };
    for &c in disambiguation {
        if let Some(file) = File::from_letter(c).filter(|_| pattern.from_file.is_none()) {
            pattern.from_file = Some(file);
        } else if let Some(rank) = Rank::from_digit(c).filter(|_| pattern.from_rank.is_none()) {
            pattern.from_rank = Some(rank);
        } else {
            return None;
        }
    }
    Some(pattern)
}

/// Find the legal move named by `specifier`
pub(crate) fn resolve(moves: &Moves, specifier: &str) -> Result<MoveCode> {
    let trimmed = specifier
        .trim()
        .trim_end_matches(['+', '#', '!', '?']);
    if trimmed.is_empty() {
        return Err(NotationError::EmptyMove.into());
    }
    let chars: Vec<char> = trimmed.chars().collect();
    let pattern = coordinates(&chars)
        .or_else(|| algebraic(&chars))
        .ok_or_else(|| NotationError::UnreadableMove(specifier.to_owned()))?;
    let mut matching = moves.iter().filter(|&code| pattern.matches(code));
    match (matching.next(), matching.next()) {
        (Some(code), None) => Ok(code),
        (None, _) => Err(Error::IllegalMove(trimmed.to_owned())),
        (Some(_), Some(_)) => Err(Error::AmbiguousMove(trimmed.to_owned())),
    }
}
