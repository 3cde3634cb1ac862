pub const MAX_WORD_LEN: usize = 15;
pub const DEFAULT_MIN_WORD_LEN: usize = 2;

// OWL is 1.7M
pub const MAX_POOL_SIZE: usize = 10 * 0x10_0000;

pub const MAX_LETTERS: usize = 63;
pub const LETTER_LIMIT: u8 = 64;

pub const OFFSET_BITS: u32 = 24;
pub const THREE_BYTE_MAX_NODES: usize = 0x1_FFFF;
pub const THREE_BYTE_MAX_LETTERS: usize = 32;
pub const THREE_BYTE_BLANK_INDEX: u8 = 32;
pub const THREE_BYTE_MAX_TILE: u8 = 0x1F;

pub const DEFAULT_BYTES_PER_FILE: u64 = 0xFFFF_FFFF;
pub const MAX_OUTFILES: usize = 100;

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    #[test]
    fn test_THREE_BYTE_MAX_NODES() {
        // 16 bits in the first two bytes plus the one folded into the flags byte
        assert_eq!(THREE_BYTE_MAX_NODES, (1 << 17) - 1);
    }

    #[test]
    fn test_LETTER_LIMIT() {
        assert_eq!(LETTER_LIMIT as usize, MAX_LETTERS + 1);
        assert_eq!(LETTER_LIMIT, 1 << 6);
    }

    #[test]
    fn test_THREE_BYTE_MAX_TILE() {
        assert_eq!(THREE_BYTE_MAX_TILE as usize, THREE_BYTE_MAX_LETTERS - 1);
    }
}
