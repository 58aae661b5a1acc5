use core::fmt;

use board::PieceKind;

use crate::{Error, Move, Result};

/// The pieces a pawn may promote into
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Promotion {
    Knight,
    Bishop,
    Rook,
    Queen,
}
impl Promotion {
    /// In the order promotions are listed among legal moves
    pub const ALL: [Promotion; 4] = [Self::Knight, Self::Bishop, Self::Rook, Self::Queen];

    pub const fn kind(self) -> PieceKind {
        PieceKind::PROMOTIONS[self as usize]
    }

    /// `None` for pawns and kings
    pub const fn from_kind(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Knight => Some(Self::Knight),
            PieceKind::Bishop => Some(Self::Bishop),
            PieceKind::Rook => Some(Self::Rook),
            PieceKind::Queen => Some(Self::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }
}

/// What a move does to the pieces: which kind moved, which kind (if any) it captured, and which
/// kind (if any) a pawn promoted into
///
/// There are 60 of these. The first 24 are promotions, keyed by `captured * 4 + promotion`
/// (with the king's ordinal standing in for "no capture", since kings are never captured). The
/// remaining 36 are keyed by `moved * 6 + captured` with the same convention.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveOutcome(u8);

const PROMOTIONS: usize = PieceKind::COUNT * 4;

/// Decoded `(moved, captured, promotion)` for every outcome ordinal
const OUTCOMES: [(PieceKind, Option<PieceKind>, Option<Promotion>); MoveOutcome::COUNT] = {
    const fn captured(ordinal: usize) -> Option<PieceKind> {
        match PieceKind::KINDS[ordinal] {
            PieceKind::King => None,
            kind => Some(kind),
        }
    }
    let mut outcomes = [(PieceKind::Pawn, None, None); MoveOutcome::COUNT];
    let mut ordinal = 0;
    while ordinal < MoveOutcome::COUNT {
        outcomes[ordinal] = if ordinal < PROMOTIONS {
            (
                PieceKind::Pawn,
                captured(ordinal >> 2),
                Some(Promotion::ALL[ordinal & 3]),
            )
        } else {
            let regular = ordinal - PROMOTIONS;
            (
                PieceKind::KINDS[regular / PieceKind::COUNT],
                captured(regular % PieceKind::COUNT),
                None,
            )
        };
        ordinal += 1;
    }
    outcomes
};

impl MoveOutcome {
    /// The number of distinct outcomes
    pub const COUNT: usize = PROMOTIONS + PieceKind::COUNT * PieceKind::COUNT;

    const fn captured_key(captured: Option<PieceKind>) -> usize {
        match captured {
            Some(kind) => kind.index(),
            None => PieceKind::King.index(),
        }
    }

    /// The outcome of a move which is not a promotion
    ///
    /// Capturing a king is not something that happens in chess, and asking for it gives the same
    /// outcome as no capture at all.
    pub const fn regular(moved: PieceKind, captured: Option<PieceKind>) -> Self {
        Self((PROMOTIONS + moved.index() * PieceKind::COUNT + Self::captured_key(captured)) as u8)
    }

    /// The outcome of a pawn promoting, possibly while capturing
    pub const fn promoting(captured: Option<PieceKind>, promotion: Promotion) -> Self {
        Self((Self::captured_key(captured) * 4 + promotion as usize) as u8)
    }

    pub const fn from_ordinal(ordinal: u8) -> Option<Self> {
        if (ordinal as usize) < Self::COUNT {
            Some(Self(ordinal))
        } else {
            None
        }
    }

    pub const fn ordinal(self) -> u8 {
        self.0
    }

    pub const fn moved(self) -> PieceKind {
        OUTCOMES[self.0 as usize].0
    }

    pub const fn captured(self) -> Option<PieceKind> {
        OUTCOMES[self.0 as usize].1
    }

    pub const fn promotion(self) -> Option<Promotion> {
        OUTCOMES[self.0 as usize].2
    }

    pub const fn is_capture(self) -> bool {
        self.captured().is_some()
    }

    /// The kind of piece standing on the destination after the move
    pub const fn placed(self) -> PieceKind {
        match self.promotion() {
            Some(promotion) => promotion.kind(),
            None => self.moved(),
        }
    }
}
impl fmt::Debug for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveOutcome({self})")
    }
}
/// Written like `P`, `NxB` or `PxR=Q`
impl fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moved().fen_letter())?;
        if let Some(captured) = self.captured() {
            write!(f, "x{}", captured.fen_letter())?;
        }
        if let Some(promotion) = self.promotion() {
            write!(f, "={}", promotion.kind().fen_letter())?;
        }
        Ok(())
    }
}

/// A move paired with its outcome, packed into one integer
///
/// The low 12 bits hold the [`Move`] ordinal and the bits above hold the [`MoveOutcome`]
/// ordinal, so codes sort by outcome first. Legal move sets are lists of these.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoveCode(u32);

impl MoveCode {
    pub const fn new(mv: Move, outcome: MoveOutcome) -> Self {
        Self((outcome.ordinal() as u32) << 12 | mv.ordinal() as u32)
    }

    /// Check that a raw integer is a valid move code
    ///
    /// ```
    /// use rules::MoveCode;
    /// assert!(MoveCode::from_raw(60 << 12).is_err());
    /// let code = MoveCode::from_raw(59 << 12 | 0x31C).unwrap();
    /// assert_eq!(code.raw(), 59 << 12 | 0x31C);
    /// ```
    pub const fn from_raw(raw: u32) -> Result<Self> {
        if (raw >> 12) < MoveOutcome::COUNT as u32 {
            Ok(Self(raw))
        } else {
            Err(Error::InvalidMoveCode(raw))
        }
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn mv(self) -> Move {
        Move::from_low_bits(self.0 as u16)
    }

    pub const fn outcome(self) -> MoveOutcome {
        MoveOutcome((self.0 >> 12) as u8)
    }

    pub const fn moved(self) -> PieceKind {
        self.outcome().moved()
    }

    pub const fn captured(self) -> Option<PieceKind> {
        self.outcome().captured()
    }

    pub const fn promotion(self) -> Option<Promotion> {
        self.outcome().promotion()
    }
}
impl fmt::Debug for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MoveCode({} {})", self.mv(), self.outcome())
    }
}
/// Written as the move, with any promotion appended like `e7-e8=Q`
impl fmt::Display for MoveCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mv())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "={}", promotion.kind().fen_letter())?;
        }
        Ok(())
    }
}
