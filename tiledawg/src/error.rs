//! Error types for dictionary compilation.

use std::path::PathBuf;

use crate::types::{NodeOffset, Word};

/// Broad class of a [`DawgError`].
///
/// None of these are recoverable: every error ends the run and leaves any
/// files already written in an unspecified state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad letter map, bad settings or input that cannot be translated.
    Configuration,
    /// Duplicate or out-of-order words.
    Ordering,
    /// A fixed-size field, the word pool or the file count overflowed.
    Capacity,
    /// The filesystem failed underneath us.
    Io,
}

/// Errors that can occur while compiling or reading a dictionary.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DawgError {
    /// The letter map could not be read
    #[error("unable to read letter map {}: {source}", .path.display())]
    MapFile {
        /// Path of the map file
        path: PathBuf,
        /// Underlying failure
        source: std::io::Error,
    },

    /// No letter map was configured
    #[error("no letter map file given")]
    MissingMapFile,

    /// More letters than a 6-bit tile field can address
    #[error("letter map has {0} letters; at most 63 fit in a node")]
    TooManyLetters(usize),

    /// The same character appears twice in the letter map
    #[error("chr U+{0:04X} appears more than once in the letter map")]
    DuplicateLetter(u32),

    /// A wide letter map with an odd number of bytes
    #[error("wide letter map has a dangling byte")]
    TruncatedMap,

    /// 32 letters only fit 3-byte nodes if the blank sits right after them
    #[error("move blank to last position in the letter map for smaller DAWG")]
    BlankNotLast,

    /// Word length limits are unusable
    #[error("invalid word length bounds {min}..={max} (must be within 1..=15)")]
    InvalidLengthBounds {
        /// Configured minimum
        min: usize,
        /// Configured maximum
        max: usize,
    },

    /// An input character has no tile, with the kill policy in force
    #[error("chr {} (U+{ch:04X}) on line {line} not in letter map; last word was {partial}", display_char(.ch))]
    UnmappedChar {
        /// Raw character code
        ch: u32,
        /// 1-based input line
        line: usize,
        /// The tiles read before the bad character
        partial: String,
    },

    /// Multibyte input that is not valid UTF-8
    #[error("invalid UTF-8 on input line {0}")]
    InvalidEncoding(usize),

    /// The word stream went backwards or repeated itself
    #[error("words {previous} and {current} are the same or out of order{}", at_line(.line))]
    OutOfOrder {
        /// Word consumed before
        previous: Word,
        /// Offending word
        current: Word,
        /// Input line of the offending word, when the source knows it
        line: Option<usize>,
    },

    /// A word reached the builder with an unusable length
    #[error("word {0} is empty or longer than 15 tiles")]
    WordLength(Word),

    /// A tile index does not fit the 6-bit letter field
    #[error("letter {0} too big")]
    LetterOverflow(u8),

    /// A tile index does not fit the 5-bit field of a 3-byte node
    #[error("char {0} too big for 3-byte nodes")]
    LetterTooWide(u8),

    /// A child offset does not fit the node's offset field
    #[error("first child offset {offset:#x} larger than {bits} bits")]
    OffsetOverflow {
        /// Offending offset
        offset: u64,
        /// Width of the field it had to fit
        bits: u32,
    },

    /// Buffered words outgrew the configured pool
    #[error("no memory left in word pool of {0} bytes")]
    PoolExhausted(usize),

    /// The splitter wanted more than the allowed number of files
    #[error("too many outfiles ({0}); infinite loop?")]
    TooManyOutfiles(usize),

    /// One sibling group alone exceeds the per-file byte limit
    #[error("sibling group of {bytes} bytes exceeds the limit of {limit} bytes per file")]
    GroupTooLarge {
        /// Size of the group
        bytes: u64,
        /// Configured limit
        limit: u64,
    },

    /// The node array breaks a structural invariant
    #[error("bad trie format at node {index}: {reason}")]
    CorruptArray {
        /// Node where the problem was seen
        index: NodeOffset,
        /// What was wrong
        reason: &'static str,
    },

    /// A node file whose length is not a whole number of nodes
    #[error("node file {} is not a whole number of {bytes_per_node}-byte nodes", .path.display())]
    TruncatedNode {
        /// Offending file
        path: PathBuf,
        /// Expected node width
        bytes_per_node: usize,
    },

    /// Node width other than 3 or 4
    #[error("unsupported node size {0}; expected 3 or 4")]
    UnknownNodeSize(usize),

    /// A JSON config file could not be parsed
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DawgError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        use DawgError::*;

        match self {
            MapFile { .. }
            | MissingMapFile
            | TooManyLetters(_)
            | DuplicateLetter(_)
            | TruncatedMap
            | BlankNotLast
            | InvalidLengthBounds { .. }
            | UnmappedChar { .. }
            | InvalidEncoding(_)
            | UnknownNodeSize(_)
            | LetterOverflow(_)
            | WordLength(_)
            | Config(_) => ErrorKind::Configuration,
            OutOfOrder { .. } => ErrorKind::Ordering,
            LetterTooWide(_)
            | OffsetOverflow { .. }
            | PoolExhausted(_)
            | TooManyOutfiles(_)
            | GroupTooLarge { .. }
            | CorruptArray { .. }
            | TruncatedNode { .. } => ErrorKind::Capacity,
            Io(_) => ErrorKind::Io,
        }
    }
}

impl DawgError {
    /// Attaches an input line to an ordering error that lacks one.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            DawgError::OutOfOrder {
                previous,
                current,
                line: None,
            } => DawgError::OutOfOrder {
                previous,
                current,
                line: Some(line),
            },
            other => other,
        }
    }
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" on line {}", line),
        None => String::new(),
    }
}

fn display_char(ch: &u32) -> char {
    std::char::from_u32(*ch).unwrap_or(std::char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_char_message() {
        let err = DawgError::UnmappedChar {
            ch: 'é' as u32,
            line: 12,
            partial: "CAF".into(),
        };
        assert_eq!(
            err.to_string(),
            "chr é (U+00E9) on line 12 not in letter map; last word was CAF"
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn kinds() {
        let err = DawgError::OutOfOrder {
            previous: Word::from_tiles(&[2, 0, 19]),
            current: Word::from_tiles(&[1, 0, 19]),
            line: None,
        };
        assert_eq!(err.kind(), ErrorKind::Ordering);
        assert_eq!(
            err.to_string(),
            "words [2,0,19] and [1,0,19] are the same or out of order"
        );
        assert_eq!(
            err.at_line(7).to_string(),
            "words [2,0,19] and [1,0,19] are the same or out of order on line 7"
        );
        assert_eq!(
            DawgError::WordLength(Word::from_tiles(&[])).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(DawgError::TooManyOutfiles(101).kind(), ErrorKind::Capacity);
        assert_eq!(DawgError::BlankNotLast.kind(), ErrorKind::Configuration);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert_eq!(DawgError::from(io).kind(), ErrorKind::Io);
    }
}
