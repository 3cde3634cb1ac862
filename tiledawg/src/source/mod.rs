//! Producing the ordered stream of words the builder consumes.
//!
//! A source is any iterator of `Result<Word, DawgError>`. [`WordReader`]
//! turns raw terminator-delimited input into words; feeding it straight to
//! the builder is the pre-sorted mode. [`BufferedWords`] collects a whole
//! source, sorts it and replays it, which is the needs-sort mode. Either way
//! the builder wraps its source in [`Ordered`], so a word that does not
//! strictly follow its predecessor stops the run.

use crate::error::DawgError;
use crate::types::Word;

mod reader;

pub use self::reader::{ReaderOptions, WordReader};

/// A forward-only stream of words.
pub trait WordSource: Iterator<Item = Result<Word, DawgError>> {}

impl<I> WordSource for I where I: Iterator<Item = Result<Word, DawgError>> {}

/// Rejects any word that is not strictly greater than the one before it.
pub struct Ordered<S> {
    inner: S,
    previous: Option<Word>,
}

impl<S: WordSource> Ordered<S> {
    pub fn new(inner: S) -> Self {
        Ordered {
            inner,
            previous: None,
        }
    }
}

impl<S: WordSource> Iterator for Ordered<S> {
    type Item = Result<Word, DawgError>;

    fn next(&mut self) -> Option<Self::Item> {
        let word = match self.inner.next()? {
            Ok(word) => word,
            Err(e) => return Some(Err(e)),
        };

        if let Some(previous) = self.previous.as_ref() {
            if word <= *previous {
                return Some(Err(DawgError::OutOfOrder {
                    previous: previous.clone(),
                    current: word,
                    line: None,
                }));
            }
        }

        self.previous = Some(word.clone());
        Some(Ok(word))
    }
}

/// Holds every word of a source in memory and replays them sorted.
///
/// Storage is charged one byte per tile plus one per word, against a fixed
/// pool. Running out of pool is an error, never a silent truncation.
#[derive(Debug)]
pub struct BufferedWords {
    words: std::vec::IntoIter<Word>,
    duplicates: usize,
}

impl BufferedWords {
    pub fn from_source<S: WordSource>(source: S, pool_size: usize) -> Result<Self, DawgError> {
        let mut words = Vec::new();
        let mut used = 0usize;

        for word in source {
            let word = word?;
            used += word.len() + 1;
            if used > pool_size {
                return Err(DawgError::PoolExhausted(pool_size));
            }
            words.push(word);
        }

        log::debug!("sorting {} words", words.len());
        words.sort_unstable();

        let before = words.len();
        words.dedup();
        let duplicates = before - words.len();
        if duplicates > 0 {
            log::debug!("collapsed {} duplicate words", duplicates);
        }

        Ok(BufferedWords {
            words: words.into_iter(),
            duplicates,
        })
    }

    /// How many exact duplicates were dropped after sorting.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

impl Iterator for BufferedWords {
    type Item = Result<Word, DawgError>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.words.next().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&[u8]]) -> Vec<Result<Word, DawgError>> {
        list.iter().map(|w| Ok(Word::from_tiles(w))).collect()
    }

    #[test]
    fn ordered_passes_increasing_words() {
        let input = words(&[&[0, 3], &[0, 3, 4], &[1, 0, 3], &[2, 0, 3]]);
        let out: Result<Vec<_>, _> = Ordered::new(input.into_iter()).collect();
        assert_eq!(out.unwrap().len(), 4);
    }

    #[test]
    fn ordered_rejects_inversion() {
        let input = words(&[&[2, 0, 3], &[1, 0, 3]]);
        let mut ordered = Ordered::new(input.into_iter());
        assert!(ordered.next().unwrap().is_ok());
        match ordered.next().unwrap() {
            Err(DawgError::OutOfOrder {
                previous, current, ..
            }) => {
                assert_eq!(previous, Word::from_tiles(&[2, 0, 3]));
                assert_eq!(current, Word::from_tiles(&[1, 0, 3]));
            }
            other => panic!("expected ordering error, got {:?}", other),
        }
    }

    #[test]
    fn ordered_rejects_duplicate() {
        let input = words(&[&[1, 0, 3], &[1, 0, 3]]);
        let out: Result<Vec<_>, _> = Ordered::new(input.into_iter()).collect();
        assert!(matches!(out, Err(DawgError::OutOfOrder { .. })));
    }

    #[test]
    fn ordered_rejects_longer_before_prefix() {
        let input = words(&[&[0, 3, 4], &[0, 3]]);
        let out: Result<Vec<_>, _> = Ordered::new(input.into_iter()).collect();
        assert!(matches!(out, Err(DawgError::OutOfOrder { .. })));
    }

    #[test]
    fn buffered_sorts_and_dedups() {
        let input = words(&[&[2, 0, 3], &[0, 3], &[1, 0, 3], &[0, 3, 4], &[0, 3]]);
        let buffered = BufferedWords::from_source(input.into_iter(), 1024).unwrap();
        assert_eq!(buffered.duplicates(), 1);
        let out: Vec<Word> = buffered.map(Result::unwrap).collect();
        assert_eq!(
            out,
            vec![
                Word::from_tiles(&[0, 3]),
                Word::from_tiles(&[0, 3, 4]),
                Word::from_tiles(&[1, 0, 3]),
                Word::from_tiles(&[2, 0, 3]),
            ]
        );
    }

    #[test]
    fn buffered_pool_exhaustion() {
        // three words of three tiles cost 12 bytes
        let list: &[&[u8]] = &[&[2, 0, 3], &[1, 0, 3], &[0, 1, 3]];
        let buffered = BufferedWords::from_source(words(list).into_iter(), 12);
        assert!(buffered.is_ok());

        let err = BufferedWords::from_source(words(list).into_iter(), 11).unwrap_err();
        assert!(matches!(err, DawgError::PoolExhausted(11)));
    }

    #[test]
    fn buffered_propagates_source_error() {
        let input = vec![
            Ok(Word::from_tiles(&[1])),
            Err(DawgError::InvalidEncoding(2)),
        ];
        let err = BufferedWords::from_source(input.into_iter(), 1024).unwrap_err();
        assert!(matches!(err, DawgError::InvalidEncoding(2)));
    }
}
