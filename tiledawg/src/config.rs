//! Settings for one compiler run.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BYTES_PER_FILE, DEFAULT_MIN_WORD_LEN, MAX_POOL_SIZE, MAX_WORD_LEN};
use crate::error::DawgError;
use crate::source::ReaderOptions;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompileConfig {
    /// Letter map, one entry per tile in tile order.
    pub map_file: Option<PathBuf>,
    /// Map entries are big-endian 16-bit codes.
    pub wide_map: bool,
    /// Input words are UTF-8 rather than one byte per character.
    pub multibyte_input: bool,
    /// Word list; standard input when unset.
    pub input_file: Option<PathBuf>,
    /// Node files are written as `<output_base>_NNN.bin`.
    pub output_base: Option<PathBuf>,
    pub start_node_file: Option<PathBuf>,
    pub word_count_file: Option<PathBuf>,
    pub bytes_per_node_file: Option<PathBuf>,
    pub report_file: Option<PathBuf>,
    pub max_bytes_per_file: u64,
    pub min_word_len: usize,
    pub max_word_len: usize,
    pub terminator: u8,
    /// Buffer and sort the input. When off, the input must already be in
    /// strictly increasing tile order.
    pub sort_input: bool,
    pub kill_on_unmapped_char: bool,
    pub force_four_byte_nodes: bool,
    /// Print the recovered word list to stderr after building.
    pub dump_text: bool,
    /// Byte budget for buffered words in sort mode.
    pub pool_size: usize,
}

impl CompileConfig {
    pub const fn default() -> CompileConfig {
        CompileConfig {
            map_file: None,
            wide_map: false,
            multibyte_input: false,
            input_file: None,
            output_base: None,
            start_node_file: None,
            word_count_file: None,
            bytes_per_node_file: None,
            report_file: None,
            max_bytes_per_file: DEFAULT_BYTES_PER_FILE,
            min_word_len: DEFAULT_MIN_WORD_LEN,
            max_word_len: MAX_WORD_LEN,
            terminator: b'\n',
            sort_input: true,
            kill_on_unmapped_char: true,
            force_four_byte_nodes: false,
            dump_text: false,
            pool_size: MAX_POOL_SIZE,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<CompileConfig, DawgError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<CompileConfig, DawgError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn validate(&self) -> Result<(), DawgError> {
        let (min, max) = (self.min_word_len, self.max_word_len);
        if min == 0 || min > max || max > MAX_WORD_LEN {
            return Err(DawgError::InvalidLengthBounds { min, max });
        }
        if self.map_file.is_none() {
            return Err(DawgError::MissingMapFile);
        }
        Ok(())
    }

    pub fn reader_options(&self) -> ReaderOptions {
        ReaderOptions {
            min_len: self.min_word_len,
            max_len: self.max_word_len,
            terminator: self.terminator,
            multibyte: self.multibyte_input,
            kill_on_unmapped: self.kill_on_unmapped_char,
        }
    }
}

impl Default for CompileConfig {
    fn default() -> Self {
        CompileConfig::default()
    }
}
