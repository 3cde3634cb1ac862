//! Expanding a node array back into its word list.

use std::io::Write;

use crate::alphabet::TileAlphabet;
use crate::constants::MAX_WORD_LEN;
use crate::error::DawgError;
use crate::reader::NodeLookup;
use crate::types::{NodeOffset, Word};

/// Every word accepted by the graph whose root group starts at `start`, in
/// tile order.
pub fn words<L: NodeLookup + ?Sized>(lookup: &L, start: NodeOffset) -> Result<Vec<Word>, DawgError> {
    let mut out = Vec::new();
    if lookup.node_count() == 0 {
        return Ok(out);
    }

    let mut prefix = Word::new();
    expand(lookup, start, &mut prefix, &mut out)?;
    Ok(out)
}

fn expand<L: NodeLookup + ?Sized>(
    lookup: &L,
    mut index: NodeOffset,
    prefix: &mut Word,
    out: &mut Vec<Word>,
) -> Result<(), DawgError> {
    if prefix.len() >= MAX_WORD_LEN {
        return Err(DawgError::CorruptArray {
            index,
            reason: "path longer than the longest word",
        });
    }

    loop {
        let node = lookup.node(index)?;

        prefix.push(node.letter());
        if node.is_terminal() {
            out.push(prefix.clone());
        }
        if node.has_children() {
            expand(lookup, node.first_child(), prefix, out)?;
        }
        prefix.pop();

        if node.is_last_sibling() {
            return Ok(());
        }
        index += 1;
    }
}

/// Writes the word list one per line, tiles rendered by their faces.
/// Returns the number of words written.
pub fn write_words<L, W>(
    lookup: &L,
    start: NodeOffset,
    alphabet: &TileAlphabet,
    writer: &mut W,
) -> Result<usize, DawgError>
where
    L: NodeLookup + ?Sized,
    W: Write,
{
    let words = words(lookup, start)?;
    for word in &words {
        writeln!(writer, "{}", alphabet.render(word))?;
    }
    writer.flush()?;
    Ok(words.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DawgBuilder;
    use crate::node::Node;
    use crate::relocate::{relocate, NodeArray};
    use crate::types::TileIndex;

    struct Raw(Vec<Node>);

    impl NodeLookup for Raw {
        fn node_count(&self) -> usize {
            self.0.len()
        }

        fn node(&self, index: NodeOffset) -> Result<Node, DawgError> {
            self.0.get(index as usize).copied().ok_or(DawgError::CorruptArray {
                index,
                reason: "out of range",
            })
        }
    }

    fn build(words: &[Word]) -> NodeArray {
        let source = words.to_vec().into_iter().map(Ok::<_, DawgError>);
        relocate(DawgBuilder::new(source).build().unwrap()).unwrap()
    }

    #[test]
    fn recovers_input() {
        let input: Vec<Word> = [
            &[0u8, 19][..],
            &[0, 19, 4],
            &[1, 0, 17, 18],
            &[1, 0, 19],
            &[2, 0, 17, 18],
            &[2, 0, 19],
            &[25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25, 25],
        ]
        .iter()
        .map(|w| Word::from_tiles(w))
        .collect();

        let array = build(&input);
        assert_eq!(words(&array, array.start_node()).unwrap(), input);
    }

    #[test]
    fn empty_array() {
        let array = build(&[]);
        assert!(words(&array, 0).unwrap().is_empty());
    }

    #[test]
    fn renders_faces() {
        let alphabet = TileAlphabet::from_bytes(b"ABCT\0", false).unwrap();
        let array = build(&[
            Word::from_tiles(&[0, 3]),
            Word::from_tiles(&[1, 0, 3]),
            Word::from_tiles(&[2, 0, 3]),
            Word::from_tiles(&[2, 4]),
        ]);

        let mut out = Vec::new();
        let n = write_words(&array, 0, &alphabet, &mut out).unwrap();
        assert_eq!(n, 4);
        assert_eq!(String::from_utf8(out).unwrap(), "AT\nBAT\nCAT\nC\\0\n");
    }

    #[test]
    fn cycle_is_corrupt() {
        // the second node is its own child, so the path never ends
        let node = Node::new(TileIndex::new(1), false, 1, true).unwrap();
        let looped = Raw(vec![node, node]);
        assert!(matches!(
            words(&looped, 0),
            Err(DawgError::CorruptArray { .. })
        ));
    }

    #[test]
    fn index_out_of_range() {
        let mut node = Node::new(TileIndex::new(1), true, 0, true).unwrap();
        node.set_first_child(9).unwrap();
        let broken = Raw(vec![node]);
        assert!(matches!(
            words(&broken, 0),
            Err(DawgError::CorruptArray { index: 9, .. })
        ));
    }
}
