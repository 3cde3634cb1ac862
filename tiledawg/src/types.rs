//! Small value types shared by every stage of the pipeline.

use std::fmt::{self, Display};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MAX_WORD_LEN;

/// Index of a node in the flat node array.
pub type NodeOffset = u32;

/// Position of one letter (or the blank) in the language's tile alphabet.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
#[serde(transparent)]
pub struct TileIndex(pub(crate) u8);

impl TileIndex {
    /// Wraps a raw tile index.
    #[inline(always)]
    pub const fn new(value: u8) -> Self {
        TileIndex(value)
    }

    /// The raw tile index.
    #[inline(always)]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A word spelled in tile indices.
///
/// Words order lexicographically by tile index, a proper prefix sorting
/// before any of its extensions. This is the order the builder consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word(SmallVec<[TileIndex; MAX_WORD_LEN + 1]>);

impl Word {
    /// An empty word.
    #[inline]
    pub fn new() -> Self {
        Word(SmallVec::new())
    }

    /// Builds a word from raw tile indices.
    pub fn from_tiles(tiles: &[u8]) -> Self {
        tiles.iter().copied().map(TileIndex).collect()
    }

    /// Appends a tile.
    #[inline]
    pub fn push(&mut self, tile: TileIndex) {
        self.0.push(tile);
    }

    /// Removes and returns the last tile.
    #[inline]
    pub fn pop(&mut self) -> Option<TileIndex> {
        self.0.pop()
    }

    /// Number of tiles two words share from the start.
    pub fn common_prefix_len(&self, other: &Word) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl Deref for Word {
    type Target = [TileIndex];

    #[inline(always)]
    fn deref(&self) -> &[TileIndex] {
        &self.0
    }
}

impl FromIterator<TileIndex> for Word {
    fn from_iter<I: IntoIterator<Item = TileIndex>>(iter: I) -> Self {
        Word(iter.into_iter().collect())
    }
}

impl Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tile) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", tile)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_sorts_first() {
        let at = Word::from_tiles(&[0, 3]);
        let ate = Word::from_tiles(&[0, 3, 4]);
        let b = Word::from_tiles(&[1]);
        assert!(at < ate);
        assert!(ate < b);
        assert!(at < b);
    }

    #[test]
    fn common_prefix() {
        let cars = Word::from_tiles(&[2, 0, 17, 18]);
        let cart = Word::from_tiles(&[2, 0, 17, 19]);
        let bars = Word::from_tiles(&[1, 0, 17, 18]);
        assert_eq!(cars.common_prefix_len(&cart), 3);
        assert_eq!(cars.common_prefix_len(&bars), 0);
        assert_eq!(cars.common_prefix_len(&Word::new()), 0);
        assert_eq!(cars.common_prefix_len(&cars), 4);
    }

    #[test]
    fn display() {
        assert_eq!(Word::from_tiles(&[2, 0, 19]).to_string(), "[2,0,19]");
        assert_eq!(Word::new().to_string(), "[]");
    }
}
