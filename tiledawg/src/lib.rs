/*! Compiler for tile-indexed word lists into a DAWG.

Turns a sorted list of words, spelled over a small per-language tile
alphabet, into a minimised Directed Acyclic Word Graph stored as a flat
array of 3- or 4-byte nodes. The emitted files are meant to be memory
mapped by a word game and walked by child/sibling offsets.

The pipeline runs strictly forward:

1. [`alphabet::TileAlphabet`] maps raw character codes to tile indices.
2. [`source`] reads raw words, translates them and enforces ordering.
3. [`builder::DawgBuilder`] builds sibling groups bottom-up and shares
   identical groups.
4. [`relocate::relocate`] moves the root group to offset 0.
5. [`codec::NodeFormat`] packs nodes into their on-disk layout.
6. [`splitter::FileSplitter`] cuts the array into size-bounded files.

# Usage

```no_run
use tiledawg::compile::Compiler;
use tiledawg::config::CompileConfig;

let mut config = CompileConfig::default();
config.map_file = Some("info.map".into());
config.input_file = Some("words.txt".into());
config.output_base = Some("out/en".into());

let report = Compiler::new(config).run().unwrap();
println!("{} words in {} nodes", report.word_count, report.node_count);
```

Building in memory, without touching the filesystem:

```
use tiledawg::builder::DawgBuilder;
use tiledawg::relocate::relocate;
use tiledawg::types::Word;

let words = vec![Word::from_tiles(&[0, 3]), Word::from_tiles(&[1, 0, 3])];
let built = DawgBuilder::new(words.into_iter().map(Ok::<_, tiledawg::DawgError>)).build().unwrap();
let array = relocate(built).unwrap();
assert_eq!(array.word_count(), 2);
```
*/

#![warn(missing_docs)]
pub mod alphabet;
pub mod builder;
pub mod codec;
pub mod compile;
pub mod config;
pub mod dump;
pub mod error;
pub mod node;
pub mod reader;
pub mod relocate;
pub mod source;
pub mod splitter;
pub mod types;

pub(crate) mod constants;

pub use crate::error::{DawgError, ErrorKind};
