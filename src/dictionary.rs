//! Pronouncing-dictionary reader.
//!
//! One record per line: `WORD#PH1 PH2 ... PHn`. Carriage returns are
//! dropped, so CRLF files read the same as LF files.

use crate::error::{Error, Result};
use crate::phonemes::phoneme_count;
use std::io::BufRead;

/// Longest accepted word, in bytes.
pub const MAX_WORD_LEN: usize = 40;

/// Longest accepted pronunciation, in bytes.
pub const MAX_PHONEMES_LEN: usize = 100;

/// A dictionary line: a word and its full pronunciation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub word: String,
    pub phonemes: String,
}

impl Record {
    pub fn phoneme_count(&self) -> usize {
        phoneme_count(&self.phonemes)
    }
}

/// Parses one line; `line_no` is 1-based and only used in errors.
///
/// Blank lines yield `Ok(None)`.
pub fn parse_record(line: &str, line_no: usize) -> Result<Option<Record>> {
    let malformed = |reason| Error::MalformedRecord {
        line: line_no,
        reason,
    };

    let line = line.strip_suffix('\n').unwrap_or(line);
    if line.trim_matches('\r').is_empty() {
        return Ok(None);
    }

    let (word, phonemes) = line.split_once('#').ok_or(malformed("missing '#'"))?;
    let word = word.trim_end_matches('\r');
    let phonemes: String = phonemes.chars().filter(|&c| c != '\r').collect();

    if word.is_empty() {
        return Err(malformed("empty word"));
    }
    if word.len() > MAX_WORD_LEN {
        return Err(malformed("word too long"));
    }
    if phonemes.len() > MAX_PHONEMES_LEN {
        return Err(malformed("pronunciation too long"));
    }

    Ok(Some(Record {
        word: word.to_owned(),
        phonemes,
    }))
}

/// Iterator over the records of a dictionary.
pub struct Records<R> {
    reader: R,
    line: String,
    line_no: usize,
}

/// Reads records from `reader` until end of input.
pub fn records<R: BufRead>(reader: R) -> Records<R> {
    Records {
        reader,
        line: String::new(),
        line_no: 0,
    }
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            match parse_record(&self.line, self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
