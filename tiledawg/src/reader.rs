//! Reading emitted node files back.
//!
//! [`NodeFileSet`] memory-maps every `<base>_NNN.bin` file and addresses the
//! nodes in them as one array, the way a game engine loads a dictionary.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapOptions};

use crate::codec::NodeFormat;
use crate::error::DawgError;
use crate::node::Node;
use crate::relocate::NodeArray;
use crate::splitter::file_name;
use crate::types::NodeOffset;

/// Random access to a node array, in memory or on disk.
pub trait NodeLookup {
    fn node_count(&self) -> usize;
    fn node(&self, index: NodeOffset) -> Result<Node, DawgError>;
}

impl NodeLookup for NodeArray {
    #[inline]
    fn node_count(&self) -> usize {
        self.len()
    }

    #[inline]
    fn node(&self, index: NodeOffset) -> Result<Node, DawgError> {
        self.nodes()
            .get(index as usize)
            .copied()
            .ok_or(DawgError::CorruptArray {
                index,
                reason: "node index out of range",
            })
    }
}

#[derive(Debug)]
struct MappedChunk {
    path: PathBuf,
    first: usize,
    buf: Mmap,
}

/// A dictionary's node files, memory-mapped and addressed globally.
#[derive(Debug)]
pub struct NodeFileSet {
    format: NodeFormat,
    chunks: Vec<MappedChunk>,
    node_count: usize,
}

impl NodeFileSet {
    /// Maps `paths` in order. Empty files contribute no nodes.
    pub fn open<P: AsRef<Path>>(paths: &[P], format: NodeFormat) -> Result<Self, DawgError> {
        let node_size = format.bytes_per_node();
        let mut chunks = Vec::with_capacity(paths.len());
        let mut node_count = 0;

        for path in paths {
            let path = path.as_ref();
            let file = File::open(path)?;
            let len = file.metadata()?.len() as usize;

            if len % node_size != 0 {
                return Err(DawgError::TruncatedNode {
                    path: path.to_path_buf(),
                    bytes_per_node: node_size,
                });
            }
            if len == 0 {
                continue;
            }

            let buf = unsafe { MmapOptions::new().map(&file)? };
            log::debug!(
                "mapped {} ({} nodes from {})",
                path.display(),
                len / node_size,
                node_count
            );
            chunks.push(MappedChunk {
                path: path.to_path_buf(),
                first: node_count,
                buf,
            });
            node_count += len / node_size;
        }

        Ok(NodeFileSet {
            format,
            chunks,
            node_count,
        })
    }

    /// Maps `<base>_000.bin`, `<base>_001.bin`, ... up to the first missing
    /// number.
    pub fn discover<P: AsRef<Path>>(base: P, format: NodeFormat) -> Result<Self, DawgError> {
        let paths = Self::paths_for(base);
        Self::open(&paths, format)
    }

    /// Existing node files for `base`, in order.
    pub fn paths_for<P: AsRef<Path>>(base: P) -> Vec<PathBuf> {
        let base = base.as_ref();
        (0..)
            .map(|n| file_name(base, n))
            .take_while(|path| path.is_file())
            .collect()
    }

    pub fn format(&self) -> NodeFormat {
        self.format
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.chunks.iter().map(|c| c.path.as_path())
    }
}

impl NodeLookup for NodeFileSet {
    #[inline]
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn node(&self, index: NodeOffset) -> Result<Node, DawgError> {
        let i = index as usize;
        if i >= self.node_count {
            return Err(DawgError::CorruptArray {
                index,
                reason: "node index out of range",
            });
        }

        let chunk_index = self.chunks.partition_point(|c| c.first <= i) - 1;
        let chunk = &self.chunks[chunk_index];
        let size = self.format.bytes_per_node();
        let offset = (i - chunk.first) * size;
        self.format.decode(&chunk.buf[offset..offset + size])
    }
}
