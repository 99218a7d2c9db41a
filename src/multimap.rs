//! MultiMap: public façade over `ProbeTable`.

use crate::config::Config;
use crate::error::Result;
use crate::table::{self, ProbeTable};
use std::fmt;

/// A string map where each key holds a stack of values, newest first.
///
/// # Examples
///
/// ```
/// use rhyme_map::MultiMap;
///
/// let mut map = MultiMap::new();
/// map.insert("S M AH0 S", "ISTHMUS")?;
/// map.insert("S M AH0 S", "CHRISTMAS")?;
///
/// assert_eq!(map.count(), 1);
/// assert_eq!(map.search("S M AH0 S"), Some("CHRISTMAS"));
///
/// let all: Vec<_> = map.multi_search("S M AH0 S").unwrap().collect();
/// assert_eq!(all, ["CHRISTMAS", "ISTHMUS"]);
/// # Ok::<(), rhyme_map::Error>(())
/// ```
pub struct MultiMap {
    table: ProbeTable,
}

impl MultiMap {
    /// Creates an empty map with the default capacity of 5119 slots.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            table: ProbeTable::new(&config),
        }
    }

    /// Number of distinct keys holding at least one value.
    pub fn count(&self) -> usize {
        self.table.len()
    }

    /// Same as [`MultiMap::count`].
    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Total number of stored values across all keys.
    pub fn value_count(&self) -> usize {
        self.table.value_count()
    }

    /// Current number of slots; always prime.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Pushes `value` on top of the values stored for `key`.
    ///
    /// Empty keys and empty values are ignored and yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Fails only if the table cannot grow past its current capacity; the
    /// pair has been stored by then.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<bool> {
        if key.is_empty() || value.is_empty() {
            return Ok(false);
        }
        self.table.insert(key, value)?;
        Ok(true)
    }

    /// Most recently inserted value for `key`.
    pub fn search(&self, key: &str) -> Option<&str> {
        self.table.head(key)
    }

    /// Every value for `key`, most recent first.
    ///
    /// The returned iterator knows its length up front.
    pub fn multi_search(&self, key: &str) -> Option<Values<'_>> {
        self.table.chain(key).map(|inner| Values { inner })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Removes the most recently inserted value for `key` and returns it.
    ///
    /// The key disappears once its last value is removed.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        self.table.pop(key)
    }

    /// Pairs in slot order, then newest-first within a key.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Renders every pair as `[key](value)`, separated by single spaces.
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.table.assert_invariants();
    }
}

impl Default for MultiMap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MultiMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "[{key}]({value})")?;
        }
        Ok(())
    }
}

impl fmt::Debug for MultiMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiMap")
            .field("keys", &self.count())
            .field("values", &self.value_count())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Values stored under one key, most recent first.
#[derive(Clone)]
pub struct Values<'a> {
    inner: table::Chain<'a>,
}

impl<'a> Iterator for Values<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Values<'_> {}

/// Iterator over `(key, value)` pairs of a [`MultiMap`].
pub struct Iter<'a> {
    inner: table::Iter<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<'a> IntoIterator for &'a MultiMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
