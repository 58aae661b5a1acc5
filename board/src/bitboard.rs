use core::{
    fmt,
    iter::FusedIterator,
    ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not, Sub, SubAssign},
};

use crate::{File, Rank, Square};

/// A set of squares, one bit per square (which is equivalent to a `u64`)
///
/// Bit `i` is set exactly when the square with index `i` is a member. Bitboards are plain values:
/// copies never alias, so a "frozen" bitboard is any bitboard you don't hold mutably.
#[repr(transparent)]
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    /// Every square on the board
    pub const FULL: Self = Self(!0);

    /// Create an empty bitboard
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The bitboard containing just the given square
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// All squares of the given rank
    pub const fn rank(rank: Rank) -> Self {
        Self(0xFF << (rank.index() * 8))
    }

    /// All squares of the given file
    pub const fn file(file: File) -> Self {
        Self(0x01010101_01010101 << file.index())
    }

    /// Query if the bitboard is empty
    ///
    /// ```
    /// use board::Bitboard;
    /// assert!(Bitboard::empty().is_empty());
    /// assert!(!Bitboard(0x01).is_empty());
    /// ```
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if `self & other` is not empty
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if `self & other` is empty
    pub const fn is_disjoint(self, other: Self) -> bool {
        !self.intersects(other)
    }

    /// Returns true if `self & other == other`
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether the given square is a member
    pub const fn has(self, square: Square) -> bool {
        self.0 & (1 << square.index()) != 0
    }

    /// Whether exactly one square is a member
    pub const fn is_single(self) -> bool {
        self.0 != 0 && self.0 & (self.0 - 1) == 0
    }

    /// The one member of this bitboard, if it has exactly one
    ///
    /// ```
    /// use board::{Bitboard, Square};
    /// assert_eq!(Bitboard::from_square(Square::E4).only(), Some(Square::E4));
    /// assert_eq!(Bitboard::empty().only(), None);
    /// assert_eq!((Bitboard::from_square(Square::E4) | Square::E5).only(), None);
    /// ```
    pub const fn only(self) -> Option<Square> {
        if self.is_single() {
            Some(Square::ALL[self.0.trailing_zeros() as usize])
        } else {
            None
        }
    }

    /// The lowest member of this bitboard, if any
    pub const fn first(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(Square::ALL[self.0.trailing_zeros() as usize])
        }
    }

    /// Returns the number of squares which are members
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// This bitboard with the given square added
    pub const fn with(self, square: Square) -> Self {
        Self(self.0 | 1 << square.index())
    }

    /// This bitboard with the given square removed
    pub const fn without(self, square: Square) -> Self {
        Self(self.0 & !(1 << square.index()))
    }

    /// Produce an iterator of all member squares, in ascending order
    ///
    /// ```
    /// use board::{Bitboard, Square};
    /// assert_eq!(Bitboard::empty().iter().count(), 0);
    /// assert_eq!(
    ///     (Bitboard::from_square(Square::H1) | Square::A1).iter().collect::<Vec<_>>(),
    ///     vec![Square::A1, Square::H1],
    /// );
    /// assert_eq!(Bitboard::FULL.iter().count(), 64);
    /// ```
    pub const fn iter(self) -> Squares {
        Squares(self.0)
    }
}

/// Bit-wise operations for combining things
///
/// These are `const` equivalents to `&`, `|`, `!`, `-`
impl Bitboard {
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn negation(self) -> Self {
        Self(!self.0)
    }

    /// The members of `self` which are not members of `other`
    pub const fn minus(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

/// Iterator over the members of a [`Bitboard`], lowest first
#[derive(Clone, Debug)]
pub struct Squares(u64);
impl Iterator for Squares {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(Square::ALL[idx as usize])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}
impl ExactSizeIterator for Squares {}
impl FusedIterator for Squares {}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = Squares;

    fn into_iter(self) -> Squares {
        self.iter()
    }
}
impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

impl BitOr<Bitboard> for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}
impl BitOr<Square> for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Square) -> Self::Output {
        self.with(rhs)
    }
}
impl<T> BitOrAssign<T> for Bitboard
where
    Bitboard: BitOr<T, Output = Bitboard>,
{
    fn bitor_assign(&mut self, rhs: T) {
        *self = *self | rhs
    }
}
impl BitAnd<Bitboard> for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.intersection(rhs)
    }
}
impl<T> BitAndAssign<T> for Bitboard
where
    Bitboard: BitAnd<T, Output = Bitboard>,
{
    fn bitand_assign(&mut self, rhs: T) {
        *self = *self & rhs
    }
}
impl BitXor<Bitboard> for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}
impl Sub<Bitboard> for Bitboard {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.minus(rhs)
    }
}
impl Sub<Square> for Bitboard {
    type Output = Self;

    fn sub(self, rhs: Square) -> Self::Output {
        self.without(rhs)
    }
}
impl<T> SubAssign<T> for Bitboard
where
    Bitboard: Sub<T, Output = Bitboard>,
{
    fn sub_assign(&mut self, rhs: T) {
        *self = *self - rhs
    }
}
impl Not for Bitboard {
    type Output = Self;
    fn not(self) -> Self::Output {
        self.negation()
    }
}

impl From<Square> for Bitboard {
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}
impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bitboard")
            .field(&format_args!("{:X}", self.0))
            .finish()
    }
}
/// Display as a TUI version of a grid, with rank 8 at the top
///
/// ```
/// use board::{Bitboard, Square};
///
/// assert_eq!(
///     Bitboard::from(Square::A1).to_string(),
///     "........\n........\n........\n........\n........\n........\n........\nX.......\n",
/// );
/// assert_eq!(
///     Bitboard::from(Square::H8).to_string(),
///     ".......X\n........\n........\n........\n........\n........\n........\n........\n",
/// );
/// ```
impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for rank in Rank::ALL.into_iter().rev() {
            for file in File::ALL {
                f.write_char(if self.has(Square::from_file_rank(file, rank)) {
                    'X'
                } else {
                    '.'
                })?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Bitboard {
        fn arbitrary(g: &mut Gen) -> Self {
            Self(u64::arbitrary(g))
        }
    }

    quickcheck! {
        fn test_negation_round_trip(bitboard: Bitboard) -> bool {
            bitboard == !!bitboard
        }

        fn test_len_and_iter_agree(bitboard: Bitboard) -> bool {
            bitboard.len() == bitboard.iter().count()
        }

        fn test_iter_ascending(bitboard: Bitboard) -> bool {
            let squares = bitboard.iter().collect::<Vec<_>>();
            squares.windows(2).all(|pair| pair[0] < pair[1])
        }

        fn test_collect_round_trip(bitboard: Bitboard) -> bool {
            bitboard.iter().collect::<Bitboard>() == bitboard
        }

        fn test_only_iff_single(bitboard: Bitboard) -> bool {
            bitboard.only().is_some() == (bitboard.len() == 1)
        }

        fn test_minus_is_disjoint(a: Bitboard, b: Bitboard) -> bool {
            (a - b).is_disjoint(b) && a.contains(a - b)
        }
    }

    #[test]
    fn check_squares_contained_in_ranks_files() {
        for square in Square::all() {
            assert!(
                Bitboard::rank(square.rank()).has(square),
                "{square} not contained in its rank",
            );
            assert!(
                Bitboard::file(square.file()).has(square),
                "{square} not contained in its file",
            );
            assert_eq!(
                Bitboard::rank(square.rank()) & Bitboard::file(square.file()),
                Bitboard::from_square(square),
            );
        }
    }
}
