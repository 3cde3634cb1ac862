//! The in-memory DAWG edge.
//!
//! Bit layout of the packed value:
//!
//! ```text
//!  31   30   29..24   23..0
//!  acc  last  tile    first child offset
//! ```
//!
//! The packed value is also the identity of a node when sibling groups are
//! compared for sharing, so two nodes are equal exactly when every field is.

use std::fmt;

use crate::constants::{LETTER_LIMIT, OFFSET_BITS};
use crate::error::DawgError;
use crate::types::{NodeOffset, TileIndex};

const TERMINAL: u32 = 1 << 31;
const LAST_SIBLING: u32 = 1 << 30;
const LETTER_SHIFT: u32 = 24;
const LETTER_MASK: u32 = 0x3F;
const OFFSET_MASK: u32 = (1 << OFFSET_BITS) - 1;

/// One edge of the graph: a letter, its flags and where its children start.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Node(u32);

impl Node {
    /// Sits at offset 0 while building so that no real group ever lands there.
    pub(crate) const PLACEHOLDER: Node = Node(u32::MAX);

    /// Packs a node, rejecting letters and offsets that do not fit.
    pub fn new(
        letter: TileIndex,
        is_terminal: bool,
        first_child: NodeOffset,
        is_last_sibling: bool,
    ) -> Result<Node, DawgError> {
        if letter.get() >= LETTER_LIMIT {
            return Err(DawgError::LetterOverflow(letter.get()));
        }

        let mut node = Node(u32::from(letter.get()) << LETTER_SHIFT);
        node.set_first_child(first_child)?;
        node.set_terminal(is_terminal);
        node.set_last_sibling(is_last_sibling);
        Ok(node)
    }

    #[inline(always)]
    pub fn is_terminal(self) -> bool {
        self.0 & TERMINAL != 0
    }

    #[inline(always)]
    pub fn is_last_sibling(self) -> bool {
        self.0 & LAST_SIBLING != 0
    }

    #[inline(always)]
    pub fn letter(self) -> TileIndex {
        TileIndex::new(((self.0 >> LETTER_SHIFT) & LETTER_MASK) as u8)
    }

    /// Offset of the first child, 0 meaning none.
    #[inline(always)]
    pub fn first_child(self) -> NodeOffset {
        self.0 & OFFSET_MASK
    }

    #[inline(always)]
    pub fn has_children(self) -> bool {
        self.first_child() != 0
    }

    /// The packed representation.
    #[inline(always)]
    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn set_terminal(&mut self, is_terminal: bool) {
        if is_terminal {
            self.0 |= TERMINAL;
        } else {
            self.0 &= !TERMINAL;
        }
    }

    pub fn set_last_sibling(&mut self, is_last_sibling: bool) {
        if is_last_sibling {
            self.0 |= LAST_SIBLING;
        } else {
            self.0 &= !LAST_SIBLING;
        }
    }

    pub fn set_first_child(&mut self, offset: NodeOffset) -> Result<(), DawgError> {
        if offset & !OFFSET_MASK != 0 {
            return Err(DawgError::OffsetOverflow {
                offset: u64::from(offset),
                bits: OFFSET_BITS,
            });
        }

        self.0 = (self.0 & !OFFSET_MASK) | offset;
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("letter", &self.letter().get())
            .field("is_terminal", &self.is_terminal())
            .field("is_last_sibling", &self.is_last_sibling())
            .field("first_child", &self.first_child())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_survive_packing() {
        let node = Node::new(TileIndex::new(19), true, 0x12_3456, false).unwrap();
        assert_eq!(node.letter(), TileIndex::new(19));
        assert!(node.is_terminal());
        assert!(!node.is_last_sibling());
        assert_eq!(node.first_child(), 0x12_3456);
        assert_eq!(node.bits(), 0x8000_0000 | (19 << 24) | 0x12_3456);
    }

    #[test]
    fn setters_leave_other_fields() {
        let mut node = Node::new(TileIndex::new(63), false, 7, false).unwrap();
        node.set_last_sibling(true);
        node.set_first_child(0xFF_FFFF).unwrap();
        assert!(node.is_last_sibling());
        assert!(!node.is_terminal());
        assert_eq!(node.letter().get(), 63);
        node.set_last_sibling(false);
        assert_eq!(node.first_child(), 0xFF_FFFF);
        assert!(!node.is_last_sibling());
    }

    #[test]
    fn rejects_wide_letter() {
        let err = Node::new(TileIndex::new(64), false, 0, true).unwrap_err();
        assert!(matches!(err, DawgError::LetterOverflow(64)));
    }

    #[test]
    fn rejects_wide_offset() {
        let err = Node::new(TileIndex::new(1), false, 1 << 24, true).unwrap_err();
        assert!(matches!(
            err,
            DawgError::OffsetOverflow {
                offset: 0x100_0000,
                bits: 24
            }
        ));
    }

    #[test]
    fn equality_is_bitwise() {
        let a = Node::new(TileIndex::new(3), true, 1, true).unwrap();
        let b = Node::new(TileIndex::new(3), true, 1, true).unwrap();
        let c = Node::new(TileIndex::new(3), true, 1, false).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
