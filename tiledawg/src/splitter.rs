//! Cutting the encoded array into size-bounded files.
//!
//! Files break only between sibling groups, so a reader walking siblings
//! never has to cross a file boundary.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::codec::NodeFormat;
use crate::constants::{DEFAULT_BYTES_PER_FILE, MAX_OUTFILES};
use crate::error::DawgError;
use crate::node::Node;
use crate::types::NodeOffset;

/// Splits a node array into chunks of at most `max_bytes_per_file` bytes.
#[derive(Clone, Copy, Debug)]
pub struct FileSplitter {
    format: NodeFormat,
    max_bytes_per_file: u64,
}

/// Encoded chunks ready to be written.
#[derive(Debug, Default)]
pub struct OutputFiles {
    buffers: Vec<Vec<u8>>,
}

impl FileSplitter {
    pub fn new(format: NodeFormat) -> Self {
        FileSplitter {
            format,
            max_bytes_per_file: DEFAULT_BYTES_PER_FILE,
        }
    }

    pub fn with_max_bytes_per_file(mut self, max_bytes_per_file: u64) -> Self {
        self.max_bytes_per_file = max_bytes_per_file;
        self
    }

    pub fn split(&self, nodes: &[Node]) -> Result<OutputFiles, DawgError> {
        let node_size = self.format.bytes_per_node() as u64;
        let mut buffers: Vec<Vec<u8>> = Vec::new();
        let mut current: Vec<u8> = Vec::new();
        let mut start = 0;

        while start < nodes.len() {
            let end = group_end(nodes, start)?;
            let group = &nodes[start..end];
            let group_bytes = group.len() as u64 * node_size;

            if current.len() as u64 + group_bytes > self.max_bytes_per_file {
                if current.is_empty() {
                    return Err(DawgError::GroupTooLarge {
                        bytes: group_bytes,
                        limit: self.max_bytes_per_file,
                    });
                }
                buffers.push(std::mem::take(&mut current));
                if buffers.len() >= MAX_OUTFILES {
                    return Err(DawgError::TooManyOutfiles(buffers.len() + 1));
                }
            }

            self.format.encode_to(group, &mut current)?;
            start = end;
        }

        if !current.is_empty() {
            buffers.push(current);
        }

        Ok(OutputFiles { buffers })
    }
}

/// One past the index of the last sibling in the group starting at `start`.
fn group_end(nodes: &[Node], start: usize) -> Result<usize, DawgError> {
    match nodes[start..].iter().position(|n| n.is_last_sibling()) {
        Some(pos) => Ok(start + pos + 1),
        None => Err(DawgError::CorruptArray {
            index: (nodes.len() - 1) as NodeOffset,
            reason: "last node not last sibling",
        }),
    }
}

impl OutputFiles {
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn buffers(&self) -> &[Vec<u8>] {
        &self.buffers
    }

    /// Writes every chunk to `<base>_NNN.bin` and returns the paths in order.
    ///
    /// Numbered files past the last chunk, left by an earlier and larger
    /// run, are removed up to the first gap so a reader discovering files by
    /// number sees only this dictionary.
    pub fn write<P: AsRef<Path>>(&self, base: P) -> Result<Vec<PathBuf>, DawgError> {
        let base = base.as_ref();
        let mut paths = Vec::with_capacity(self.buffers.len());

        for (i, buffer) in self.buffers.iter().enumerate() {
            let path = file_name(base, i);
            std::fs::write(&path, buffer)?;
            log::info!("wrote {} bytes to {}", buffer.len(), path.display());
            paths.push(path);
        }

        remove_stale(base, self.buffers.len())?;
        Ok(paths)
    }
}

fn remove_stale(base: &Path, from: usize) -> Result<(), DawgError> {
    for n in from.. {
        let path = file_name(base, n);
        if !path.is_file() {
            break;
        }
        std::fs::remove_file(&path)?;
        log::info!("removed stale {}", path.display());
    }
    Ok(())
}

/// Name of the `n`th node file for `base`.
pub fn file_name(base: &Path, n: usize) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!("_{:03}.bin", n));
    PathBuf::from(name)
}
