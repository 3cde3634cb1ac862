use std::io::BufRead;

use crate::alphabet::TileAlphabet;
use crate::constants::{DEFAULT_MIN_WORD_LEN, MAX_WORD_LEN};
use crate::error::DawgError;
use crate::types::Word;

/// How raw input is split, decoded and filtered.
#[derive(Clone, Debug)]
pub struct ReaderOptions {
    pub min_len: usize,
    pub max_len: usize,
    pub terminator: u8,
    /// Decode each word as UTF-8 instead of one byte per character.
    pub multibyte: bool,
    /// Fail on an unmapped character instead of dropping its word.
    pub kill_on_unmapped: bool,
}

impl ReaderOptions {
    pub const fn default() -> ReaderOptions {
        ReaderOptions {
            min_len: DEFAULT_MIN_WORD_LEN,
            max_len: MAX_WORD_LEN,
            terminator: b'\n',
            multibyte: false,
            kill_on_unmapped: true,
        }
    }
}

/// Reads terminator-delimited raw words and translates them into tiles.
///
/// Words outside the length bounds are dropped. So are words with an
/// unmapped character, unless `kill_on_unmapped` is set, in which case the
/// first one ends the stream with [`DawgError::UnmappedChar`].
pub struct WordReader<'a, R> {
    input: R,
    alphabet: &'a TileAlphabet,
    options: ReaderOptions,
    buf: Vec<u8>,
    line: usize,
    dropped: usize,
    failed: bool,
}

impl<'a, R: BufRead> WordReader<'a, R> {
    pub fn new(input: R, alphabet: &'a TileAlphabet, options: ReaderOptions) -> Self {
        WordReader {
            input,
            alphabet,
            options,
            buf: Vec::with_capacity(64),
            line: 0,
            dropped: 0,
            failed: false,
        }
    }

    /// Number of words skipped so far for length or unmapped characters.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 1-based number of the last line read.
    pub fn line(&self) -> usize {
        self.line
    }

    fn read_raw(&mut self) -> Result<bool, DawgError> {
        self.buf.clear();
        let n = self
            .input
            .read_until(self.options.terminator, &mut self.buf)?;
        if n == 0 {
            return Ok(false);
        }

        if self.buf.last() == Some(&self.options.terminator) {
            self.buf.pop();
        }
        self.line += 1;
        Ok(true)
    }

    fn translate(&self) -> Result<Option<Word>, DawgError> {
        let codes: Vec<u32> = if self.options.multibyte {
            std::str::from_utf8(&self.buf)
                .map_err(|_| DawgError::InvalidEncoding(self.line))?
                .chars()
                .map(u32::from)
                .collect()
        } else {
            self.buf.iter().map(|&b| u32::from(b)).collect()
        };

        let mut word = Word::new();
        for ch in codes {
            match self.alphabet.tile(ch) {
                Some(tile) => word.push(tile),
                None if self.options.kill_on_unmapped => {
                    return Err(DawgError::UnmappedChar {
                        ch,
                        line: self.line,
                        partial: self.alphabet.render(&word),
                    });
                }
                None => {
                    log::debug!(
                        "line {}: chr U+{:04X} not in letter map; dropping partial word {}",
                        self.line,
                        ch,
                        self.alphabet.render(&word)
                    );
                    return Ok(None);
                }
            }
        }

        if word.len() < self.options.min_len || word.len() > self.options.max_len {
            if !word.is_empty() {
                log::debug!(
                    "line {}: dropping word {} of length {}",
                    self.line,
                    self.alphabet.render(&word),
                    word.len()
                );
            }
            return Ok(None);
        }

        Ok(Some(word))
    }
}

impl<'a, R: BufRead> Iterator for WordReader<'a, R> {
    type Item = Result<Word, DawgError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let result = self
                .read_raw()
                .and_then(|more| if more { self.translate().map(Some) } else { Ok(None) });

            match result {
                Ok(Some(Some(word))) => return Some(Ok(word)),
                Ok(Some(None)) => self.dropped += 1,
                Ok(None) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn alphabet() -> TileAlphabet {
        TileAlphabet::from_bytes(b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\0", false).unwrap()
    }

    fn read_all(input: &[u8], options: ReaderOptions) -> (Result<Vec<Word>, DawgError>, usize) {
        let alphabet = alphabet();
        let mut reader = WordReader::new(Cursor::new(input.to_vec()), &alphabet, options);
        let words: Result<Vec<Word>, DawgError> = reader.by_ref().collect();
        (words, reader.dropped())
    }

    #[test]
    fn translates_words() {
        let (words, dropped) = read_all(b"AT\nBAT\nCAT\n", ReaderOptions::default());
        assert_eq!(
            words.unwrap(),
            vec![
                Word::from_tiles(&[0, 19]),
                Word::from_tiles(&[1, 0, 19]),
                Word::from_tiles(&[2, 0, 19]),
            ]
        );
        assert_eq!(dropped, 0);
    }

    #[test]
    fn last_word_without_terminator() {
        let (words, _) = read_all(b"AT\nCAT", ReaderOptions::default());
        assert_eq!(words.unwrap().len(), 2);
    }

    #[test]
    fn length_bounds() {
        let mut options = ReaderOptions::default();
        options.min_len = 3;
        options.max_len = 4;
        let (words, dropped) = read_all(b"AT\nBAT\nBATS\nBATHS\n\nCAT\n", options);
        assert_eq!(
            words.unwrap(),
            vec![
                Word::from_tiles(&[1, 0, 19]),
                Word::from_tiles(&[1, 0, 19, 18]),
                Word::from_tiles(&[2, 0, 19]),
            ]
        );
        assert_eq!(dropped, 3);
    }

    #[test]
    fn overlong_words_dropped_not_truncated() {
        let (words, dropped) = read_all(b"ABCDEFGHIJKLMNOP\nCAT\n", ReaderOptions::default());
        assert_eq!(words.unwrap(), vec![Word::from_tiles(&[2, 0, 19])]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn unmapped_char_kills() {
        let (words, _) = read_all(b"AT\nCAt\nDOG\n", ReaderOptions::default());
        match words.unwrap_err() {
            DawgError::UnmappedChar { ch, line, partial } => {
                assert_eq!(ch, 't' as u32);
                assert_eq!(line, 2);
                assert_eq!(partial, "CA");
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn unmapped_char_drops_when_lenient() {
        let mut options = ReaderOptions::default();
        options.kill_on_unmapped = false;
        let (words, dropped) = read_all(b"AT\nCAt\nDOG\n", options);
        assert_eq!(
            words.unwrap(),
            vec![Word::from_tiles(&[0, 19]), Word::from_tiles(&[3, 14, 6])]
        );
        assert_eq!(dropped, 1);
    }

    #[test]
    fn custom_terminator() {
        let mut options = ReaderOptions::default();
        options.terminator = 0;
        let (words, _) = read_all(b"AT\0CAT\0", options);
        assert_eq!(words.unwrap().len(), 2);
    }

    #[test]
    fn multibyte_input() {
        let alphabet = TileAlphabet::from_codes("AÄBÖ".chars().map(u32::from)).unwrap();
        let mut options = ReaderOptions::default();
        options.multibyte = true;
        let input = "ÄB\nBÖÖ\n".as_bytes().to_vec();
        let words: Result<Vec<Word>, _> =
            WordReader::new(Cursor::new(input), &alphabet, options).collect();
        assert_eq!(
            words.unwrap(),
            vec![Word::from_tiles(&[1, 2]), Word::from_tiles(&[2, 3, 3])]
        );
    }

    #[test]
    fn invalid_utf8() {
        let mut options = ReaderOptions::default();
        options.multibyte = true;
        let (words, _) = read_all(b"AT\nC\xFFT\n", options);
        assert!(matches!(words, Err(DawgError::InvalidEncoding(2))));
    }

    #[test]
    fn single_byte_latin1() {
        let alphabet = TileAlphabet::from_bytes(b"A\xC4B", false).unwrap();
        let words: Result<Vec<Word>, _> =
            WordReader::new(Cursor::new(b"\xC4B\n".to_vec()), &alphabet, ReaderOptions::default())
                .collect();
        assert_eq!(words.unwrap(), vec![Word::from_tiles(&[1, 2])]);
    }

    #[test]
    fn stops_after_error() {
        let alphabet = alphabet();
        let mut reader = WordReader::new(
            Cursor::new(b"a\nCAT\n".to_vec()),
            &alphabet,
            ReaderOptions::default(),
        );
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
