//! The whole run: letter map and word list in, node files out.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::Serialize;

use crate::alphabet::TileAlphabet;
use crate::builder::DawgBuilder;
use crate::codec::NodeFormat;
use crate::config::CompileConfig;
use crate::dump;
use crate::error::DawgError;
use crate::relocate::relocate;
use crate::source::{BufferedWords, WordReader};
use crate::splitter::FileSplitter;
use crate::types::NodeOffset;

/// What a run produced.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CompileReport {
    pub word_count: u32,
    pub node_count: usize,
    pub bytes_per_node: usize,
    pub start_node: NodeOffset,
    pub files: Vec<PathBuf>,
    /// Input words skipped for length or unmapped characters.
    pub dropped_words: usize,
    /// Exact duplicates collapsed in sort mode.
    pub duplicates: usize,
}

pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    pub fn new(config: CompileConfig) -> Self {
        Compiler { config }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Reads the input from `input_file`, or stdin when it is unset.
    pub fn run(&self) -> Result<CompileReport, DawgError> {
        let input: Box<dyn BufRead> = match self.config.input_file.as_ref() {
            Some(path) => Box::new(BufReader::new(File::open(path)?)),
            None => Box::new(BufReader::new(io::stdin())),
        };
        self.run_with_input(input)
    }

    pub fn run_with_input<R: BufRead>(&self, input: R) -> Result<CompileReport, DawgError> {
        let config = &self.config;
        config.validate()?;

        let map_file = config.map_file.as_ref().ok_or(DawgError::MissingMapFile)?;
        let alphabet = TileAlphabet::load(map_file, config.wide_map)?;
        log::debug!(
            "loaded {} letters from {} (blank: {:?})",
            alphabet.letter_count(),
            map_file.display(),
            alphabet.blank()
        );

        let mut reader = WordReader::new(input, &alphabet, config.reader_options());
        let (built, duplicates) = if config.sort_input {
            let buffered = BufferedWords::from_source(reader.by_ref(), config.pool_size)?;
            let duplicates = buffered.duplicates();
            (DawgBuilder::new(buffered).build()?, duplicates)
        } else {
            let built = DawgBuilder::new(reader.by_ref()).build();
            (built.map_err(|e| e.at_line(reader.line()))?, 0)
        };
        let dropped_words = reader.dropped();
        if dropped_words > 0 {
            log::info!("dropped {} input words", dropped_words);
        }

        let word_count = built.word_count;
        let array = relocate(built)?;
        let start_node = array.start_node();
        log::info!(
            "{} words in {} (0x{:x}) nodes",
            word_count,
            array.len(),
            array.len()
        );

        if let Some(path) = config.start_node_file.as_ref() {
            write_u32_file(path, start_node)?;
        }

        if let Some(path) = config.word_count_file.as_ref() {
            write_u32_file(path, word_count)?;
            log::info!("wrote {} (word count) to {}", word_count, path.display());
        }

        let format = NodeFormat::select(array.len(), &alphabet, config.force_four_byte_nodes)?;

        let files = match config.output_base.as_ref() {
            Some(base) => FileSplitter::new(format)
                .with_max_bytes_per_file(config.max_bytes_per_file)
                .split(array.nodes())?
                .write(base)?,
            None => Vec::new(),
        };

        if config.dump_text {
            let stderr = io::stderr();
            let mut stderr = stderr.lock();
            dump::write_words(&array, start_node, &alphabet, &mut stderr)?;
        }

        if let Some(path) = config.bytes_per_node_file.as_ref() {
            std::fs::write(path, format.bytes_per_node().to_string())?;
        }
        log::info!("used {} bytes per node", format.bytes_per_node());

        let report = CompileReport {
            word_count,
            node_count: array.len(),
            bytes_per_node: format.bytes_per_node(),
            start_node,
            files,
            dropped_words,
            duplicates,
        };

        if let Some(path) = config.report_file.as_ref() {
            let mut file = File::create(path)?;
            serde_json::to_writer_pretty(&mut file, &report).map_err(io::Error::from)?;
            file.write_all(b"\n")?;
        }

        Ok(report)
    }
}

fn write_u32_file(path: &Path, value: u32) -> Result<(), DawgError> {
    let mut file = File::create(path)?;
    file.write_u32::<BigEndian>(value)?;
    Ok(())
}

/// Reads a word-count or start-node file.
pub fn read_u32_file<P: AsRef<Path>>(path: P) -> Result<u32, DawgError> {
    let mut file = File::open(path)?;
    Ok(file.read_u32::<BigEndian>()?)
}

/// Reads a bytes-per-node indicator file.
pub fn read_bytes_per_node_file<P: AsRef<Path>>(path: P) -> Result<NodeFormat, DawgError> {
    let text = std::fs::read_to_string(path)?;
    let bytes = text.trim().parse::<usize>().map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("bytes per node file holds {:?}, not a number", text),
        )
    })?;
    NodeFormat::from_bytes_per_node(bytes)
}
