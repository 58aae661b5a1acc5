use core::fmt;

use crate::{Bitboard, Square};

/// A sparse map from squares to values
///
/// The key set is kept as a [`Bitboard`], and values are stored densely in ascending square
/// order, so a lookup is a popcount of the keys below the square.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SquareMap<T> {
    keys: Bitboard,
    values: Vec<T>,
}

impl<T> SquareMap<T> {
    pub const fn new() -> Self {
        Self {
            keys: Bitboard::empty(),
            values: Vec::new(),
        }
    }

    /// The position in `values` that `square` has or would have
    fn slot(&self, square: Square) -> usize {
        let below = (1u64 << square.index()) - 1;
        (self.keys.0 & below).count_ones() as usize
    }

    /// The squares which have values
    pub const fn keys(&self) -> Bitboard {
        self.keys
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub const fn contains_key(&self, square: Square) -> bool {
        self.keys.has(square)
    }

    pub fn get(&self, square: Square) -> Option<&T> {
        if self.keys.has(square) {
            Some(&self.values[self.slot(square)])
        } else {
            None
        }
    }

    /// Insert a value, returning the value previously stored for the square
    pub fn insert(&mut self, square: Square, value: T) -> Option<T> {
        let slot = self.slot(square);
        if self.keys.has(square) {
            Some(core::mem::replace(&mut self.values[slot], value))
        } else {
            self.keys |= square;
            self.values.insert(slot, value);
            None
        }
    }

    pub fn remove(&mut self, square: Square) -> Option<T> {
        if self.keys.has(square) {
            let slot = self.slot(square);
            self.keys -= square;
            Some(self.values.remove(slot))
        } else {
            None
        }
    }

    /// The entries of this map, in ascending square order
    pub fn iter(&self) -> impl Iterator<Item = (Square, &T)> + '_ {
        self.keys.iter().zip(self.values.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.values.iter()
    }
}
impl<T> Default for SquareMap<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> FromIterator<(Square, T)> for SquareMap<T> {
    fn from_iter<I: IntoIterator<Item = (Square, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (square, value) in iter {
            map.insert(square, value);
        }
        map
    }
}
impl<T: fmt::Debug> fmt::Debug for SquareMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_out_of_order() {
        let mut map = SquareMap::new();
        assert_eq!(map.insert(Square::E4, 'e'), None);
        assert_eq!(map.insert(Square::A1, 'a'), None);
        assert_eq!(map.insert(Square::H8, 'h'), None);
        assert_eq!(map.insert(Square::E4, 'E'), Some('e'));
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![(Square::A1, &'a'), (Square::E4, &'E'), (Square::H8, &'h')],
        );
        assert_eq!(map.get(Square::E4), Some(&'E'));
        assert_eq!(map.get(Square::E5), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut map = [(Square::C3, 3), (Square::B2, 2), (Square::D4, 4)]
            .into_iter()
            .collect::<SquareMap<_>>();
        assert_eq!(map.remove(Square::C3), Some(3));
        assert_eq!(map.remove(Square::C3), None);
        assert_eq!(map.get(Square::D4), Some(&4));
        assert_eq!(
            map.keys(),
            Bitboard::from_square(Square::B2) | Square::D4
        );
    }
}
