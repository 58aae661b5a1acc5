use core::{fmt, str::FromStr};

use crate::{Color, Error, Result};

/// A column of the board, from the queen's side to the king's side
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}
impl File {
    pub const ALL: [File; 8] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn new(index: u8) -> Result<Self> {
        if index < 8 {
            Ok(Self::ALL[index as usize])
        } else {
            Err(Error::InvalidFile(index))
        }
    }

    /// The lowercase letter naming this file
    pub const fn letter(self) -> char {
        (b'a' + self as u8) as char
    }

    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'a'..='h' => Some(Self::ALL[(letter as u8 - b'a') as usize]),
            _ => None,
        }
    }

    /// The signed number of files from `self` to `other`
    pub const fn difference(self, other: Self) -> i8 {
        other as i8 - self as i8
    }

    /// The file one step from `self` in the direction of `target`, if they differ
    ///
    /// ```
    /// use board::File;
    /// assert_eq!(File::E.towards(File::G), Some(File::F));
    /// assert_eq!(File::E.towards(File::C), Some(File::D));
    /// assert_eq!(File::E.towards(File::E), None);
    /// ```
    pub const fn towards(self, target: Self) -> Option<Self> {
        let idx = self as usize;
        if (target as usize) < idx {
            Some(Self::ALL[idx - 1])
        } else if (target as usize) > idx {
            Some(Self::ALL[idx + 1])
        } else {
            None
        }
    }

    /// The edge file on the same half of the board
    pub const fn nearest_flank(self) -> Self {
        if (self as u8) < 4 {
            Self::A
        } else {
            Self::H
        }
    }
}
impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A row of the board, counted from white's side
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}
impl Rank {
    pub const ALL: [Rank; 8] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn new(index: u8) -> Result<Self> {
        if index < 8 {
            Ok(Self::ALL[index as usize])
        } else {
            Err(Error::InvalidRank(index))
        }
    }

    /// The digit naming this rank
    pub const fn digit(self) -> char {
        (b'1' + self as u8) as char
    }

    pub const fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1'..='8' => Some(Self::ALL[(digit as u8 - b'1') as usize]),
            _ => None,
        }
    }

    /// The signed number of ranks from `self` to `other`
    pub const fn difference(self, other: Self) -> i8 {
        other as i8 - self as i8
    }

    /// The rank on which the given color's king and rooks start
    pub const fn home(color: Color) -> Self {
        match color {
            Color::White => Self::One,
            Color::Black => Self::Eight,
        }
    }

    /// The rank on which the given color's pawns start
    pub const fn pawn_start(color: Color) -> Self {
        match color {
            Color::White => Self::Two,
            Color::Black => Self::Seven,
        }
    }

    /// The rank on which the given color's pawns promote
    pub const fn promotion(color: Color) -> Self {
        Self::home(color.other())
    }

    /// The rank holding any en passant target square when `to_move` is about to move
    ///
    /// The target is the square the opponent's pawn skipped over, so it lies on the opponent's
    /// side of the board.
    pub const fn en_passant_target(to_move: Color) -> Self {
        match to_move {
            Color::White => Self::Six,
            Color::Black => Self::Three,
        }
    }
}
impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.digit())
    }
}

/// One of the 64 squares on the board
///
/// The inner value is `rank * 8 + file`, so `a1` is 0 and `h8` is 63. Values outside of that
/// range are never constructed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

/// Declare the named square constants
macro_rules! square_consts {
    ($($name:ident = $idx:expr),* $(,)?) => {
        impl Square {
            $(pub const $name: Square = Square($idx);)*
        }
    };
}
square_consts! {
    A1 = 0, B1 = 1, C1 = 2, D1 = 3, E1 = 4, F1 = 5, G1 = 6, H1 = 7,
    A2 = 8, B2 = 9, C2 = 10, D2 = 11, E2 = 12, F2 = 13, G2 = 14, H2 = 15,
    A3 = 16, B3 = 17, C3 = 18, D3 = 19, E3 = 20, F3 = 21, G3 = 22, H3 = 23,
    A4 = 24, B4 = 25, C4 = 26, D4 = 27, E4 = 28, F4 = 29, G4 = 30, H4 = 31,
    A5 = 32, B5 = 33, C5 = 34, D5 = 35, E5 = 36, F5 = 37, G5 = 38, H5 = 39,
    A6 = 40, B6 = 41, C6 = 42, D6 = 43, E6 = 44, F6 = 45, G6 = 46, H6 = 47,
    A7 = 48, B7 = 49, C7 = 50, D7 = 51, E7 = 52, F7 = 53, G7 = 54, H7 = 55,
    A8 = 56, B8 = 57, C8 = 58, D8 = 59, E8 = 60, F8 = 61, G8 = 62, H8 = 63,
}

impl Square {
    /// The number of squares on the board
    pub const COUNT: usize = 64;

    /// Get the square with the given index
    ///
    /// ```
    /// use board::Square;
    /// assert_eq!(Square::new(28), Ok(Square::E4));
    /// assert!(Square::new(64).is_err());
    /// ```
    pub const fn new(index: u8) -> Result<Self> {
        if index < 64 {
            Ok(Self(index))
        } else {
            Err(Error::InvalidSquareIndex(index))
        }
    }

    /// Every square, indexed by its own index
    pub const ALL: [Square; 64] = {
        let mut all = [Square(0); 64];
        let mut idx = 0;
        while idx < 64 {
            all[idx] = Square(idx as u8);
            idx += 1;
        }
        all
    };

    pub const fn from_file_rank(file: File, rank: Rank) -> Self {
        Self(rank as u8 * 8 + file as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn file(self) -> File {
        File::ALL[(self.0 & 7) as usize]
    }

    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 >> 3) as usize]
    }

    /// Whether this is one of the light squares (`h1` is light)
    pub const fn is_light(self) -> bool {
        (self.0 >> 3) & 1 != self.0 & 1
    }

    /// The square the given number of ranks and files away, if it is on the board
    ///
    /// ```
    /// use board::Square;
    /// assert_eq!(Square::A1.offset(1, 3), Some(Square::D2));
    /// assert_eq!(Square::D2.offset(-1, -3), Some(Square::A1));
    /// assert_eq!(Square::F7.offset(0, 0), Some(Square::F7));
    /// assert_eq!(Square::D1.offset(-1, 0), None);
    /// assert_eq!(Square::H4.offset(0, 1), None);
    /// ```
    pub const fn offset(self, rank: i8, file: i8) -> Option<Self> {
        let new_rank = (self.0 >> 3) as i8 + rank;
        let new_file = (self.0 & 7) as i8 + file;
        if new_rank < 0 || new_rank > 7 || new_file < 0 || new_file > 7 {
            None
        } else {
            Some(Self((new_rank * 8 + new_file) as u8))
        }
    }

    /// An iterator over all squares in ascending index order
    ///
    /// ```
    /// assert_eq!(board::Square::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> + Clone {
        Self::ALL.into_iter()
    }

    /// The name of this square, like `"e4"`
    pub const fn as_str(self) -> &'static str {
        const NAMES: [&str; 64] = [
            "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h1", //
            "a2", "b2", "c2", "d2", "e2", "f2", "g2", "h2", //
            "a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3", //
            "a4", "b4", "c4", "d4", "e4", "f4", "g4", "h4", //
            "a5", "b5", "c5", "d5", "e5", "f5", "g5", "h5", //
            "a6", "b6", "c6", "d6", "e6", "f6", "g6", "h6", //
            "a7", "b7", "c7", "d7", "e7", "f7", "g7", "h7", //
            "a8", "b8", "c8", "d8", "e8", "f8", "g8", "h8", //
        ];
        NAMES[self.0 as usize]
    }
}
impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Square").field(&self.as_str()).finish()
    }
}
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for Square {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => {
                match (File::from_letter(file), Rank::from_digit(rank)) {
                    (Some(file), Some(rank)) => Ok(Self::from_file_rank(file, rank)),
                    _ => Err(Error::InvalidSquareName(s.to_owned())),
                }
            }
            _ => Err(Error::InvalidSquareName(s.to_owned())),
        }
    }
}
impl TryFrom<u8> for Square {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}
impl From<Square> for u8 {
    fn from(value: Square) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Square {
        fn arbitrary(g: &mut Gen) -> Self {
            Self(u8::arbitrary(g) % 64)
        }
    }

    quickcheck! {
        fn test_square_name_round_trip(square: Square) -> bool {
            Square::from_str(square.as_str()) == Ok(square)
        }

        fn test_file_rank_round_trip(square: Square) -> bool {
            Square::from_file_rank(square.file(), square.rank()) == square
        }

        fn test_offset_inverse(square: Square, rank: i8, file: i8) -> bool {
            let (rank, file) = (rank % 8, file % 8);
            match square.offset(rank, file) {
                Some(moved) => moved.offset(-rank, -file) == Some(square),
                None => true,
            }
        }
    }

    #[test]
    fn test_bad_square_names() {
        for name in ["", "e", "e9", "i1", "e44", "E4"] {
            assert_eq!(
                Square::from_str(name),
                Err(Error::InvalidSquareName(name.to_owned())),
            );
        }
    }

    #[test]
    fn test_square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
        assert!(Square::D1.is_light());
        assert!(!Square::E1.is_light());
        assert!(!Square::H8.is_light());
    }

    #[test]
    fn test_ranks_and_files() {
        assert_eq!(File::new(8), Err(Error::InvalidFile(8)));
        assert_eq!(Rank::new(9), Err(Error::InvalidRank(9)));
        assert_eq!(Square::E4.file(), File::E);
        assert_eq!(Square::E4.rank(), Rank::Four);
        assert_eq!(File::C.nearest_flank(), File::A);
        assert_eq!(File::G.nearest_flank(), File::H);
        assert_eq!(Rank::en_passant_target(Color::White), Rank::Six);
        assert_eq!(Rank::en_passant_target(Color::Black), Rank::Three);
        assert_eq!(Rank::promotion(Color::White), Rank::Eight);
    }
}
