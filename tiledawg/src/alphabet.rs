//! The per-language table between raw character codes and tile indices.

use std::path::Path;

use hashbrown::HashMap;

use crate::constants::MAX_LETTERS;
use crate::error::DawgError;
use crate::types::TileIndex;

/// Bijection between raw character codes and tile indices.
///
/// Tiles are numbered in map-file order starting at 0. A zero code is the
/// blank: it takes up a tile index but maps no input character.
#[derive(Debug, Clone)]
pub struct TileAlphabet {
    pub(crate) faces: Vec<u32>,
    pub(crate) char_to_tile: HashMap<u32, TileIndex>,
    pub(crate) blank: Option<TileIndex>,
}

impl TileAlphabet {
    /// Reads a letter map file. With `wide` each entry is a big-endian
    /// 16-bit code, otherwise one byte.
    pub fn load<P: AsRef<Path>>(path: P, wide: bool) -> Result<Self, DawgError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DawgError::MapFile {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_bytes(&bytes, wide)
    }

    /// Parses the raw contents of a letter map file.
    pub fn from_bytes(bytes: &[u8], wide: bool) -> Result<Self, DawgError> {
        if wide {
            if bytes.len() % 2 != 0 {
                return Err(DawgError::TruncatedMap);
            }
            Self::from_codes(
                bytes
                    .chunks_exact(2)
                    .map(|pair| u32::from(u16::from_be_bytes([pair[0], pair[1]]))),
            )
        } else {
            Self::from_codes(bytes.iter().map(|&b| u32::from(b)))
        }
    }

    /// Builds the table from character codes in tile order.
    pub fn from_codes<I: IntoIterator<Item = u32>>(codes: I) -> Result<Self, DawgError> {
        let mut faces = Vec::with_capacity(64);
        let mut char_to_tile = HashMap::new();
        let mut blank = None;

        for code in codes {
            let tile = TileIndex::new(faces.len().min(u8::MAX as usize) as u8);

            if code == 0 {
                if blank.is_some() {
                    return Err(DawgError::DuplicateLetter(0));
                }
                blank = Some(tile);
            } else if char_to_tile.insert(code, tile).is_some() {
                return Err(DawgError::DuplicateLetter(code));
            }

            faces.push(code);

            if char_to_tile.len() > MAX_LETTERS {
                return Err(DawgError::TooManyLetters(char_to_tile.len()));
            }
        }

        Ok(TileAlphabet {
            faces,
            char_to_tile,
            blank,
        })
    }

    /// Tile for an input character, if it has one.
    #[inline(always)]
    pub fn tile(&self, ch: u32) -> Option<TileIndex> {
        self.char_to_tile.get(&ch).copied()
    }

    /// Character code shown on a tile.
    #[inline(always)]
    pub fn face(&self, tile: TileIndex) -> Option<u32> {
        self.faces.get(tile.get() as usize).copied()
    }

    #[inline(always)]
    pub fn blank(&self) -> Option<TileIndex> {
        self.blank
    }

    /// Number of tiles, blank included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Number of letters, blank excluded. This is what sizes the node format.
    #[inline(always)]
    pub fn letter_count(&self) -> usize {
        self.char_to_tile.len()
    }

    /// Renders tiles by their faces for logs and text dumps. Faces below
    /// 0x20 print as a backslash and a digit.
    pub fn render(&self, tiles: &[TileIndex]) -> String {
        let mut out = String::with_capacity(tiles.len());
        for &tile in tiles {
            match self.face(tile) {
                Some(code) if code >= 0x20 => {
                    out.push(std::char::from_u32(code).unwrap_or(std::char::REPLACEMENT_CHARACTER))
                }
                Some(code) => {
                    out.push('\\');
                    out.push_str(&code.to_string());
                }
                None => out.push('?'),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> TileAlphabet {
        let mut map = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ".to_vec();
        map.push(0);
        TileAlphabet::from_bytes(&map, false).unwrap()
    }

    #[test]
    fn tiles_follow_file_order() {
        let alphabet = english();
        assert_eq!(alphabet.tile('A' as u32), Some(TileIndex::new(0)));
        assert_eq!(alphabet.tile('Z' as u32), Some(TileIndex::new(25)));
        assert_eq!(alphabet.tile('a' as u32), None);
        assert_eq!(alphabet.blank(), Some(TileIndex::new(26)));
        assert_eq!(alphabet.len(), 27);
        assert_eq!(alphabet.letter_count(), 26);
        assert_eq!(alphabet.face(TileIndex::new(2)), Some('C' as u32));
    }

    #[test]
    fn blank_is_not_a_letter() {
        let alphabet = english();
        assert_eq!(alphabet.tile(0), None);
    }

    #[test]
    fn wide_entries() {
        let map = [0x00, b'A', 0x01, 0x31, 0x00, 0x00];
        let alphabet = TileAlphabet::from_bytes(&map, true).unwrap();
        assert_eq!(alphabet.tile('A' as u32), Some(TileIndex::new(0)));
        assert_eq!(alphabet.tile('ı' as u32), Some(TileIndex::new(1)));
        assert_eq!(alphabet.blank(), Some(TileIndex::new(2)));
    }

    #[test]
    fn wide_odd_length() {
        let err = TileAlphabet::from_bytes(&[0x00, b'A', 0x00], true).unwrap_err();
        assert!(matches!(err, DawgError::TruncatedMap));
    }

    #[test]
    fn too_many_letters() {
        let ok = TileAlphabet::from_codes(1..=63).unwrap();
        assert_eq!(ok.letter_count(), 63);

        let ok = TileAlphabet::from_codes((1..=63).chain(std::iter::once(0))).unwrap();
        assert_eq!(ok.blank(), Some(TileIndex::new(63)));

        let err = TileAlphabet::from_codes(1..=64).unwrap_err();
        assert!(matches!(err, DawgError::TooManyLetters(64)));
    }

    #[test]
    fn duplicates() {
        let err = TileAlphabet::from_bytes(b"ABCA", false).unwrap_err();
        assert!(matches!(err, DawgError::DuplicateLetter(0x41)));

        let err = TileAlphabet::from_bytes(b"A\0B\0", false).unwrap_err();
        assert!(matches!(err, DawgError::DuplicateLetter(0)));
    }

    #[test]
    fn render() {
        let alphabet = english();
        let cat = [TileIndex::new(2), TileIndex::new(0), TileIndex::new(19)];
        assert_eq!(alphabet.render(&cat), "CAT");
        assert_eq!(alphabet.render(&[TileIndex::new(26)]), "\\0");
        assert_eq!(alphabet.render(&[TileIndex::new(40)]), "?");
    }

    #[test]
    fn missing_file() {
        let err = TileAlphabet::load("/nonexistent/tiledawg/info.map", false).unwrap_err();
        assert!(matches!(err, DawgError::MapFile { .. }));
    }
}
