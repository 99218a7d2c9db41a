//! Homophone index: two co-indexed multi-maps over a pronouncing dictionary.
//!
//! `words` maps each word to the last `suffix_len` phonemes of its
//! pronunciation; `rhymes` maps that suffix back to every word ending in
//! it. A lookup is one `search` on `words` followed by one `multi_search`
//! on `rhymes`.

use crate::dictionary::{records, Record};
use crate::error::{Error, Result};
use crate::multimap::MultiMap;
use crate::phonemes::filter_phonemes;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Suffix length used when none is given.
pub const DEFAULT_SUFFIX_LEN: usize = 3;

pub struct HomophoneIndex {
    words: MultiMap,
    rhymes: MultiMap,
    suffix_len: usize,
}

impl HomophoneIndex {
    /// Creates an empty index matching on the last `suffix_len` phonemes.
    pub fn new(suffix_len: usize) -> Result<Self> {
        if suffix_len == 0 {
            return Err(Error::InvalidSuffixLength);
        }
        Ok(Self {
            words: MultiMap::new(),
            rhymes: MultiMap::new(),
            suffix_len,
        })
    }

    /// Builds an index from dictionary text.
    pub fn from_reader<R: BufRead>(reader: R, suffix_len: usize) -> Result<Self> {
        let mut index = Self::new(suffix_len)?;
        let mut indexed = 0usize;
        let mut skipped = 0usize;
        for record in records(reader) {
            if index.add(&record?)? {
                indexed += 1;
            } else {
                skipped += 1;
            }
        }
        log::info!(
            "Indexed {indexed} words into {} rhyme groups (suffix length {suffix_len})",
            index.rhymes.count()
        );
        if skipped > 0 {
            log::debug!("Skipped {skipped} words with fewer than {suffix_len} phonemes");
        }
        Ok(index)
    }

    /// Builds an index from the dictionary file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, suffix_len: usize) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading dictionary from {path:?}");
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), suffix_len)
    }

    /// Adds one dictionary record.
    ///
    /// Returns `Ok(false)` if its pronunciation is shorter than the suffix
    /// length, in which case the word is not indexed.
    pub fn add(&mut self, record: &Record) -> Result<bool> {
        let Some(suffix) = filter_phonemes(&record.phonemes, self.suffix_len) else {
            return Ok(false);
        };
        let stored = self.words.insert(&record.word, suffix)?;
        self.rhymes.insert(suffix, &record.word)?;
        Ok(stored)
    }

    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// Number of distinct indexed words.
    pub fn word_count(&self) -> usize {
        self.words.count()
    }

    /// Words sharing the last `suffix_len` phonemes with `word`.
    ///
    /// Returns `None` if `word` is unknown or too short to have a suffix.
    /// The result includes `word` itself.
    pub fn lookup<'a>(&'a self, word: &'a str) -> Option<Homophones<'a>> {
        let phonemes = self.words.search(word)?;
        let matches = self.rhymes.multi_search(phonemes)?.collect();
        Some(Homophones {
            word,
            phonemes,
            matches,
        })
    }
}

impl fmt::Debug for HomophoneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomophoneIndex")
            .field("suffix_len", &self.suffix_len)
            .field("words", &self.words)
            .field("rhymes", &self.rhymes)
            .finish()
    }
}

/// Result of a homophone lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Homophones<'a> {
    pub word: &'a str,
    /// The shared phoneme suffix.
    pub phonemes: &'a str,
    /// Every word ending in `phonemes`, most recently indexed first.
    pub matches: Vec<&'a str>,
}

impl fmt::Display for Homophones<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}):", self.word, self.phonemes)?;
        for m in &self.matches {
            write!(f, " {m}")?;
        }
        Ok(())
    }
}
