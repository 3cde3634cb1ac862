//! Moving the root sibling group to the front of the array.
//!
//! The builder emits the root group last. Readers expect it at offset 0, so
//! the group is cut out, the placeholder dropped, and the group put back at
//! the head. Every other group then sits `root_len - 1` further along than
//! before, and every child offset is shifted by the same amount.

use crate::builder::BuiltDawg;
use crate::error::DawgError;
use crate::node::Node;
use crate::types::NodeOffset;

/// A finished node array with its root group at offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeArray {
    nodes: Vec<Node>,
    word_count: u32,
}

impl NodeArray {
    #[inline(always)]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Index of the first root node. Always 0 after relocation.
    #[inline(always)]
    pub fn start_node(&self) -> NodeOffset {
        0
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Puts the root group first and rewrites child offsets to match.
pub fn relocate(built: BuiltDawg) -> Result<NodeArray, DawgError> {
    let BuiltDawg {
        mut nodes,
        root_offset,
        word_count,
    } = built;

    if root_offset == 0 {
        if word_count != 0 {
            return Err(DawgError::CorruptArray {
                index: 0,
                reason: "words were read but no root group was built",
            });
        }
        return Ok(NodeArray {
            nodes: Vec::new(),
            word_count,
        });
    }

    let root = root_offset as usize;
    if root >= nodes.len() {
        return Err(DawgError::CorruptArray {
            index: root_offset,
            reason: "root offset past the end of the array",
        });
    }

    let mut relocated = nodes.split_off(root);
    let delta = (relocated.len() - 1) as NodeOffset;

    // drop the placeholder
    nodes.remove(0);
    relocated.extend(nodes);

    for (index, node) in relocated.iter_mut().enumerate() {
        let child = node.first_child();
        if child != 0 {
            node.set_first_child(child + delta).map_err(|_| DawgError::CorruptArray {
                index: index as NodeOffset,
                reason: "relocated child offset does not fit",
            })?;
        }
    }

    log::debug!(
        "relocated root group of {} to the front; offsets shifted by {}",
        delta + 1,
        delta
    );

    Ok(NodeArray {
        nodes: relocated,
        word_count,
    })
}
