//! Phoneme-string helpers.
//!
//! A pronunciation is a single-space separated token list such as
//! `"K R IH1 S M AH0 S"`.

/// Number of space-separated tokens in `phonemes`.
pub fn phoneme_count(phonemes: &str) -> usize {
    if phonemes.is_empty() {
        0
    } else {
        phonemes.split(' ').count()
    }
}

/// The last `n` phonemes of `phonemes`, borrowed unchanged.
///
/// Returns `None` when `n` is zero or the pronunciation is shorter than `n`.
///
/// ```
/// use rhyme_map::phonemes::filter_phonemes;
///
/// assert_eq!(filter_phonemes("1 2 3 4 5", 3), Some("3 4 5"));
/// assert_eq!(filter_phonemes("1 2", 3), None);
/// ```
pub fn filter_phonemes(phonemes: &str, n: usize) -> Option<&str> {
    if n == 0 || phonemes.is_empty() {
        return None;
    }
    match phonemes.rmatch_indices(' ').nth(n - 1) {
        Some((at, _)) => Some(&phonemes[at + 1..]),
        None if phoneme_count(phonemes) == n => Some(phonemes),
        None => None,
    }
}
