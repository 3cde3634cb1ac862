//! On-disk node layouts.
//!
//! 3-byte nodes:
//!
//! ```text
//!  byte 0   child offset bits 15..8
//!  byte 1   child offset bits 7..0
//!  byte 2   0x80 accepting | 0x40 last sibling | 0x20 child offset bit 16 | tile (5 bits)
//! ```
//!
//! 4-byte nodes:
//!
//! ```text
//!  byte 0   child offset bits 15..8
//!  byte 1   child offset bits 7..0
//!  byte 2   0x80 accepting | 0x40 last sibling | tile (6 bits)
//!  byte 3   child offset bits 23..16
//! ```

use std::io::{Cursor, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::alphabet::TileAlphabet;
use crate::constants::{
    OFFSET_BITS, THREE_BYTE_BLANK_INDEX, THREE_BYTE_MAX_LETTERS, THREE_BYTE_MAX_NODES,
    THREE_BYTE_MAX_TILE,
};
use crate::error::DawgError;
use crate::node::Node;
use crate::types::TileIndex;

const ACCEPTING: u8 = 0x80;
const LAST_SIBLING: u8 = 0x40;
const THREE_BYTE_HIGH_BIT: u8 = 0x20;
const FOUR_BYTE_TILE_MASK: u8 = 0x3F;

/// Which of the two node layouts a dictionary uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeFormat {
    ThreeByte,
    FourByte,
}

impl NodeFormat {
    /// Picks the narrowest layout that can hold `node_count` nodes over
    /// `alphabet`.
    ///
    /// An alphabet of exactly 32 letters fits the 5-bit tile field only when
    /// the blank comes right after the letters, at index 32, where it is
    /// never written into a node.
    pub fn select(
        node_count: usize,
        alphabet: &TileAlphabet,
        force_four: bool,
    ) -> Result<NodeFormat, DawgError> {
        let letters = alphabet.letter_count();

        if force_four || node_count > THREE_BYTE_MAX_NODES || letters > THREE_BYTE_MAX_LETTERS {
            return Ok(NodeFormat::FourByte);
        }

        if letters < THREE_BYTE_MAX_LETTERS {
            return Ok(NodeFormat::ThreeByte);
        }

        match alphabet.blank() {
            Some(blank) if blank == TileIndex::new(THREE_BYTE_BLANK_INDEX) => {
                Ok(NodeFormat::ThreeByte)
            }
            _ => Err(DawgError::BlankNotLast),
        }
    }

    #[inline(always)]
    pub fn bytes_per_node(self) -> usize {
        match self {
            NodeFormat::ThreeByte => 3,
            NodeFormat::FourByte => 4,
        }
    }

    pub fn from_bytes_per_node(bytes: usize) -> Result<NodeFormat, DawgError> {
        match bytes {
            3 => Ok(NodeFormat::ThreeByte),
            4 => Ok(NodeFormat::FourByte),
            n => Err(DawgError::UnknownNodeSize(n)),
        }
    }

    /// Writes one node in this layout.
    pub fn encode<W: Write>(self, node: Node, writer: &mut W) -> Result<(), DawgError> {
        let child = node.first_child();
        let tile = node.letter().get();

        let mut flags = 0u8;
        if node.is_terminal() {
            flags |= ACCEPTING;
        }
        if node.is_last_sibling() {
            flags |= LAST_SIBLING;
        }

        match self {
            NodeFormat::ThreeByte => {
                if tile > THREE_BYTE_MAX_TILE {
                    return Err(DawgError::LetterTooWide(tile));
                }
                if child as usize > THREE_BYTE_MAX_NODES {
                    return Err(DawgError::OffsetOverflow {
                        offset: u64::from(child),
                        bits: 17,
                    });
                }
                if child & 0x1_0000 != 0 {
                    flags |= THREE_BYTE_HIGH_BIT;
                }
                writer.write_u16::<BigEndian>((child & 0xFFFF) as u16)?;
                writer.write_u8(flags | tile)?;
            }
            NodeFormat::FourByte => {
                if child >> OFFSET_BITS != 0 {
                    return Err(DawgError::OffsetOverflow {
                        offset: u64::from(child),
                        bits: OFFSET_BITS,
                    });
                }
                writer.write_u16::<BigEndian>((child & 0xFFFF) as u16)?;
                writer.write_u8(flags | (tile & FOUR_BYTE_TILE_MASK))?;
                writer.write_u8((child >> 16) as u8)?;
            }
        }

        Ok(())
    }

    /// Appends the whole slice to `out`.
    pub fn encode_to(self, nodes: &[Node], out: &mut Vec<u8>) -> Result<(), DawgError> {
        out.reserve(nodes.len() * self.bytes_per_node());
        for &node in nodes {
            self.encode(node, out)?;
        }
        Ok(())
    }

    /// Reads one node from the first `bytes_per_node` bytes of `bytes`.
    pub fn decode(self, bytes: &[u8]) -> Result<Node, DawgError> {
        let mut cursor = Cursor::new(bytes);
        let low = u32::from(cursor.read_u16::<BigEndian>()?);
        let flags = cursor.read_u8()?;

        let (tile, child) = match self {
            NodeFormat::ThreeByte => {
                let high = u32::from(flags & THREE_BYTE_HIGH_BIT) << 11;
                (flags & THREE_BYTE_MAX_TILE, low | high)
            }
            NodeFormat::FourByte => {
                let high = u32::from(cursor.read_u8()?) << 16;
                (flags & FOUR_BYTE_TILE_MASK, low | high)
            }
        };

        Node::new(
            TileIndex::new(tile),
            flags & ACCEPTING != 0,
            child,
            flags & LAST_SIBLING != 0,
        )
    }
}
