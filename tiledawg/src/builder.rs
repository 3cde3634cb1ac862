//! Depth-first construction of the node array.
//!
//! Words arrive in strictly increasing order. [`DawgBuilder::build`] recurses
//! over shared prefixes, emitting each parent's sibling group only after all
//! of its children's groups are in the array. Every finished group is looked
//! up in a [`SubarrayIndex`] first; an identical group already stored is
//! reused instead of appended, which is what merges shared suffixes and
//! turns the trie into a DAWG.

use hashbrown::HashMap;

use crate::constants::MAX_WORD_LEN;
use crate::error::DawgError;
use crate::node::Node;
use crate::source::{Ordered, WordSource};
use crate::types::{NodeOffset, Word};

/// Maps the exact contents of every stored sibling group to its offset.
#[derive(Debug, Default)]
pub struct SubarrayIndex {
    groups: HashMap<Box<[Node]>, NodeOffset>,
}

impl SubarrayIndex {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn find(&self, edges: &[Node]) -> Option<NodeOffset> {
        self.groups.get(edges).copied()
    }

    pub fn register(&mut self, edges: &[Node], offset: NodeOffset) {
        let previous = self.groups.insert(edges.into(), offset);
        debug_assert!(previous.is_none(), "entry for key shouldn't exist");
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// The raw output of a build, before the root group is moved to the front.
#[derive(Debug)]
pub struct BuiltDawg {
    /// Node array with the placeholder still at offset 0.
    pub nodes: Vec<Node>,
    /// Offset of the top-level sibling group, 0 if there were no words.
    pub root_offset: NodeOffset,
    /// Number of words consumed.
    pub word_count: u32,
}

/// Build state threaded through the recursion.
pub struct DawgBuilder<S> {
    source: Ordered<S>,
    current: Word,
    first_diff: usize,
    exhausted: bool,
    nodes: Vec<Node>,
    subarrays: SubarrayIndex,
    word_count: u32,
}

impl<S: WordSource> DawgBuilder<S> {
    pub fn new(source: S) -> Self {
        DawgBuilder {
            source: Ordered::new(source),
            current: Word::new(),
            first_diff: 0,
            exhausted: false,
            nodes: Vec::new(),
            subarrays: SubarrayIndex::new(),
            word_count: 0,
        }
    }

    /// Consumes the whole source and returns the unrelocated node array.
    pub fn build(mut self) -> Result<BuiltDawg, DawgError> {
        self.nodes.push(Node::PLACEHOLDER);
        self.pull()?;

        let root_offset = self.build_node(0)?;

        log::debug!(
            "built {} nodes from {} words; {} distinct sibling groups",
            self.nodes.len() - 1,
            self.word_count,
            self.subarrays.len()
        );

        Ok(BuiltDawg {
            nodes: self.nodes,
            root_offset,
            word_count: self.word_count,
        })
    }

    fn pull(&mut self) -> Result<(), DawgError> {
        let next = if self.exhausted {
            None
        } else {
            self.source.next().transpose()?
        };

        match next {
            Some(word) => {
                if word.is_empty() || word.len() > MAX_WORD_LEN {
                    return Err(DawgError::WordLength(word));
                }
                self.first_diff = self.current.common_prefix_len(&word);
                self.current = word;
                self.word_count += 1;
            }
            None => {
                self.exhausted = true;
                self.first_diff = 0;
                self.current = Word::new();
            }
        }

        Ok(())
    }

    fn build_node(&mut self, depth: usize) -> Result<NodeOffset, DawgError> {
        if self.current.len() == depth {
            // This word ends here. Unless the next one continues it, the
            // branch is done.
            self.pull()?;
            if self.first_diff < depth || self.exhausted {
                return Ok(0);
            }
        }

        let mut edges = Vec::new();
        loop {
            let letter = self.current[depth];
            let is_terminal = self.current.len() - 1 == depth;

            let first_child = self.build_node(depth + 1)?;
            let mut node = Node::new(letter, is_terminal, first_child, false)?;

            let group_end = self.first_diff != depth || self.exhausted;
            if group_end {
                node.set_last_sibling(true);
            }
            edges.push(node);

            if group_end {
                break;
            }
        }

        self.add_nodes(&edges)
    }

    fn add_nodes(&mut self, edges: &[Node]) -> Result<NodeOffset, DawgError> {
        if let Some(offset) = self.subarrays.find(edges) {
            if offset == 0 {
                return Err(DawgError::CorruptArray {
                    index: 0,
                    reason: "0 is an invalid match",
                });
            }
            log::trace!("reusing group of {} at {}", edges.len(), offset);
            return Ok(offset);
        }

        let offset = self.nodes.len() as NodeOffset;
        self.nodes.extend_from_slice(edges);
        self.subarrays.register(edges, offset);
        log::trace!("added group of {} at {}", edges.len(), offset);
        Ok(offset)
    }
}
