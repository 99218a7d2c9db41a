//! ProbeTable: prime-sized slot array over an arena of same-key chains.
//!
//! Distinct keys never share a slot. A key lands on its `djb2` slot when
//! that slot is free, otherwise on the first free slot of a linear scan that
//! starts `sdbm` slots further on. Repeated keys prepend to the chain already
//! heading their slot, so a chain's head is always the newest value.

use crate::config::{Config, GrowthPolicy};
use crate::error::{Error, Result};
use crate::hash::{djb2, next_prime, sdbm};
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
struct Entry {
    key: String,
    value: String,
    next: Option<DefaultKey>, // older value for the same key
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Slot {
    Empty,
    /// A chain lived here and was deleted. Lookups walk past it, inserts may reuse it.
    Tombstone,
    Chain(DefaultKey),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Probe {
    Found { idx: usize, head: DefaultKey },
    Vacant(usize),
    Exhausted,
}

/// Slot index order for `key`: the primary slot, then a full linear pass
/// starting at `(sdbm mod cap + primary) mod cap`.
fn probe_sequence(key: &str, capacity: usize) -> impl Iterator<Item = usize> {
    let cap = capacity as u64;
    let primary = (djb2(key) % cap) as usize;
    let start = ((sdbm(key) % cap) as usize + primary) % capacity;
    std::iter::once(primary).chain((0..capacity).map(move |i| (start + i) % capacity))
}

#[derive(Debug)]
struct Buckets {
    slots: Vec<Slot>,
    counts: Vec<usize>,
    occupied: usize,
    tombstones: usize,
}

impl Buckets {
    fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Slot::Empty; capacity],
            counts: vec![0; capacity],
            occupied: 0,
            tombstones: 0,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn locate(&self, entries: &SlotMap<DefaultKey, Entry>, key: &str) -> Probe {
        let mut reusable = None;
        for idx in probe_sequence(key, self.capacity()) {
            match self.slots[idx] {
                Slot::Empty => return Probe::Vacant(reusable.unwrap_or(idx)),
                Slot::Tombstone => {
                    reusable.get_or_insert(idx);
                }
                Slot::Chain(head) => {
                    let matches = entries
                        .get(head)
                        .map(|e| e.key == key)
                        .unwrap_or(false);
                    if matches {
                        return Probe::Found { idx, head };
                    }
                }
            }
        }
        reusable.map_or(Probe::Exhausted, Probe::Vacant)
    }

    fn occupy(&mut self, idx: usize, head: DefaultKey, count: usize) {
        if self.slots[idx] == Slot::Tombstone {
            self.tombstones -= 1;
        }
        self.slots[idx] = Slot::Chain(head);
        self.counts[idx] = count;
        self.occupied += 1;
    }

    fn vacate(&mut self, idx: usize) {
        self.slots[idx] = Slot::Tombstone;
        self.counts[idx] = 0;
        self.occupied -= 1;
        self.tombstones += 1;
    }
}

pub(crate) struct ProbeTable {
    entries: SlotMap<DefaultKey, Entry>,
    buckets: Buckets,
    growth_factor: usize,
    growth_policy: GrowthPolicy,
}

impl ProbeTable {
    pub fn new(config: &Config) -> Self {
        let capacity = next_prime(config.initial_capacity)
            .expect("requested capacity has no prime successor in usize");
        Self {
            entries: SlotMap::with_key(),
            buckets: Buckets::new(capacity),
            growth_factor: config.growth_factor,
            growth_policy: config.growth_policy,
        }
    }

    /// Number of slots holding a chain, i.e. distinct live keys.
    pub fn len(&self) -> usize {
        self.buckets.occupied
    }

    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    pub fn value_count(&self) -> usize {
        self.entries.len()
    }

    /// Prepends `value` to the chain for `key` and applies the growth policy.
    ///
    /// Returns the slot the key occupies before any rehash.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<usize> {
        let idx = match self.buckets.locate(&self.entries, key) {
            Probe::Found { idx, head } => {
                let node = self.entries.insert(Entry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    next: Some(head),
                });
                self.buckets.slots[idx] = Slot::Chain(node);
                idx
            }
            Probe::Vacant(idx) => {
                let node = self.entries.insert(Entry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                    next: None,
                });
                self.buckets.occupy(idx, node, 0);
                idx
            }
            Probe::Exhausted => {
                return Err(Error::TableFull {
                    capacity: self.capacity(),
                })
            }
        };
        self.buckets.counts[idx] += 1;

        self.maybe_rehash()?;
        Ok(idx)
    }

    /// Newest value stored for `key`.
    pub fn head(&self, key: &str) -> Option<&str> {
        match self.buckets.locate(&self.entries, key) {
            Probe::Found { head, .. } => self.entries.get(head).map(|e| e.value.as_str()),
            _ => None,
        }
    }

    /// All values stored for `key`, newest first.
    pub fn chain(&self, key: &str) -> Option<Chain<'_>> {
        match self.buckets.locate(&self.entries, key) {
            Probe::Found { idx, head } => Some(Chain {
                entries: &self.entries,
                next: Some(head),
                remaining: self.buckets.counts[idx],
            }),
            _ => None,
        }
    }

    /// Removes and returns the newest value for `key`.
    pub fn pop(&mut self, key: &str) -> Option<String> {
        let Probe::Found { idx, head } = self.buckets.locate(&self.entries, key) else {
            return None;
        };
        let entry = self.entries.remove(head)?;
        match entry.next {
            Some(next) => {
                self.buckets.slots[idx] = Slot::Chain(next);
                self.buckets.counts[idx] -= 1;
            }
            None => self.buckets.vacate(idx),
        }
        Some(entry.value)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            entries: &self.entries,
            slots: &self.buckets.slots,
            pos: 0,
            cursor: None,
        }
    }

    fn maybe_rehash(&mut self) -> Result<()> {
        let capacity = self.capacity();
        let Buckets {
            occupied,
            tombstones,
            ..
        } = self.buckets;

        if self.growth_policy.exceeded(occupied, capacity) {
            let target = capacity
                .checked_mul(self.growth_factor)
                .and_then(next_prime)
                .ok_or(Error::CapacityOverflow)?;
            self.rehash(target)?;
            log::debug!("Grew table from {capacity} to {target} slots holding {occupied} keys");
        } else if self.growth_policy.exceeded(occupied + tombstones, capacity) {
            self.rehash(capacity)?;
            log::trace!("Purged {tombstones} tombstones from table of {capacity} slots");
        }
        Ok(())
    }

    /// Moves every chain into a fresh slot array of `capacity` slots.
    ///
    /// Each chain is placed once by its head key and keeps its count. The
    /// current slots are untouched unless every chain found a place.
    fn rehash(&mut self, capacity: usize) -> Result<()> {
        let mut fresh = Buckets::new(capacity);
        for (idx, slot) in self.buckets.slots.iter().enumerate() {
            let Slot::Chain(head) = *slot else {
                continue;
            };
            let key = self.entries[head].key.as_str();
            match fresh.locate(&self.entries, key) {
                Probe::Vacant(to) => fresh.occupy(to, head, self.buckets.counts[idx]),
                Probe::Found { .. } | Probe::Exhausted => {
                    return Err(Error::TableFull { capacity });
                }
            }
        }
        self.buckets = fresh;
        Ok(())
    }

    /// Panics if any structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let b = &self.buckets;
        assert!(crate::hash::is_prime(b.capacity()), "capacity not prime");
        assert_eq!(b.counts.len(), b.capacity());
        assert!(b.occupied + b.tombstones <= b.capacity());

        let mut occupied = 0;
        let mut tombstones = 0;
        let mut values = 0;
        for (idx, slot) in b.slots.iter().enumerate() {
            match *slot {
                Slot::Empty => assert_eq!(b.counts[idx], 0),
                Slot::Tombstone => {
                    tombstones += 1;
                    assert_eq!(b.counts[idx], 0);
                }
                Slot::Chain(head) => {
                    occupied += 1;
                    let key = &self.entries[head].key;
                    assert_eq!(self.buckets.locate(&self.entries, key), Probe::Found { idx, head });
                    let mut len = 0;
                    let mut cursor = Some(head);
                    while let Some(k) = cursor {
                        let e = &self.entries[k];
                        assert_eq!(&e.key, key, "chain mixes keys");
                        len += 1;
                        cursor = e.next;
                    }
                    assert_eq!(b.counts[idx], len, "slot count out of sync");
                    values += len;
                }
            }
        }
        assert_eq!(occupied, b.occupied);
        assert_eq!(tombstones, b.tombstones);
        assert_eq!(values, self.entries.len(), "unreachable entries");
    }
}

/// Values of one key, newest first.
#[derive(Clone)]
pub struct Chain<'a> {
    entries: &'a SlotMap<DefaultKey, Entry>,
    next: Option<DefaultKey>,
    remaining: usize,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.next?)?;
        self.next = entry.next;
        self.remaining -= 1;
        Some(&entry.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Chain<'_> {}

/// `(key, value)` pairs in slot order, then chain order.
pub struct Iter<'a> {
    entries: &'a SlotMap<DefaultKey, Entry>,
    slots: &'a [Slot],
    pos: usize,
    cursor: Option<DefaultKey>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.cursor.and_then(|k| self.entries.get(k)) {
                self.cursor = entry.next;
                return Some((&entry.key, &entry.value));
            }
            let slot = self.slots.get(self.pos)?;
            self.pos += 1;
            self.cursor = match *slot {
                Slot::Chain(head) => Some(head),
                _ => None,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn small(capacity: usize, policy: GrowthPolicy) -> ProbeTable {
        ProbeTable::new(
            &Config::default()
                .initial_capacity(capacity)
                .growth_policy(policy),
        )
    }

    fn primary(key: &str, capacity: usize) -> usize {
        (djb2(key) % capacity as u64) as usize
    }

    /// Two distinct keys whose primary slots coincide at `capacity`.
    fn colliding_pair(capacity: usize) -> (String, String) {
        let keys: Vec<String> = (0..1000).map(|i| format!("k{i}")).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                if primary(a, capacity) == primary(b, capacity) {
                    return (a.clone(), b.clone());
                }
            }
        }
        unreachable!("pigeonhole guarantees a collision");
    }

    /// Invariant: the probe sequence starts at the primary slot and then
    /// covers every slot exactly once.
    #[test]
    fn probe_sequence_covers_table() {
        let cap = 11;
        let seq: Vec<usize> = probe_sequence("S M AH0 S", cap).collect();
        assert_eq!(seq.len(), cap + 1);
        assert_eq!(seq[0], primary("S M AH0 S", cap));
        let mut rest = seq[1..].to_vec();
        rest.sort_unstable();
        assert_eq!(rest, (0..cap).collect::<Vec<_>>());
    }

    /// Invariant: a repeated key prepends to its own chain; a colliding
    /// distinct key moves to another slot instead of co-chaining.
    #[test]
    fn collisions_probe_repeats_chain() {
        let cap = 101;
        let (a, b) = colliding_pair(cap);
        let mut t = small(cap, GrowthPolicy::WhenFull);

        let ia = t.insert(&a, "1").unwrap();
        let ib = t.insert(&b, "2").unwrap();
        let ia2 = t.insert(&a, "3").unwrap();

        assert_eq!(ia, primary(&a, cap));
        assert_ne!(ia, ib);
        assert_eq!(ia, ia2);
        assert_eq!(t.len(), 2);
        assert_eq!(t.chain(&a).unwrap().collect::<Vec<_>>(), ["3", "1"]);
        assert_eq!(t.head(&b), Some("2"));
        t.assert_invariants();
    }

    /// Invariant: deleting the key that pushed another key down its probe
    /// sequence leaves a tombstone, so the displaced key stays reachable
    /// and the tombstone is reused by the next new key that probes it.
    #[test]
    fn tombstone_keeps_displaced_key_reachable() {
        let cap = 101;
        let (a, b) = colliding_pair(cap);
        let mut t = small(cap, GrowthPolicy::WhenFull);
        let ia = t.insert(&a, "a").unwrap();
        t.insert(&b, "b").unwrap();

        assert_eq!(t.pop(&a).as_deref(), Some("a"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.head(&a), None);
        assert_eq!(t.head(&b), Some("b"));
        assert_eq!(t.buckets.slots[ia], Slot::Tombstone);
        t.assert_invariants();

        // `a` probes its primary first, which is the tombstone.
        assert_eq!(t.insert(&a, "again").unwrap(), ia);
        assert_eq!(t.buckets.tombstones, 0);
        t.assert_invariants();
    }

    /// Invariant: growth multiplies the capacity by the growth factor and
    /// rounds up to a prime; chains keep their order and their counts.
    #[test]
    fn growth_moves_whole_chains() {
        let mut t = small(7, GrowthPolicy::default());
        for v in ["v1", "v2", "v3"] {
            t.insert("shared", v).unwrap();
        }
        for i in 0..5 {
            t.insert(&format!("key{i}"), "x").unwrap();
        }
        // 6 keys over 7 slots crossed 0.75; 7 * 5 = 35 -> 37.
        assert_eq!(t.capacity(), 37);
        assert_eq!(t.len(), 6);
        let chain = t.chain("shared").unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.collect::<Vec<_>>(), ["v3", "v2", "v1"]);
        t.assert_invariants();
    }

    /// Invariant: with `WhenFull`, capacity stays put until every slot
    /// holds a chain.
    #[test]
    fn when_full_policy_defers_growth() {
        let mut t = small(7, GrowthPolicy::WhenFull);
        for i in 0..6 {
            t.insert(&format!("key{i}"), "x").unwrap();
        }
        assert_eq!(t.capacity(), 7);
        t.insert("key6", "x").unwrap();
        assert_eq!(t.capacity(), 37);
        assert_eq!(t.len(), 7);
        t.assert_invariants();
    }

    /// Invariant: tombstones count toward the purge threshold, and a purge
    /// keeps the capacity while clearing them.
    #[test]
    fn churn_purges_tombstones_without_growing() {
        let mut t = small(11, GrowthPolicy::default());
        for round in 0..50 {
            let key = format!("churn{round}");
            t.insert(&key, "x").unwrap();
            assert_eq!(t.pop(&key).as_deref(), Some("x"));
            t.assert_invariants();
        }
        assert_eq!(t.capacity(), 11);
        assert!(t.buckets.tombstones < 9);
        assert_eq!(t.len(), 0);
    }

    /// Invariant: a scan over a table with no free slot and no match ends
    /// with `Exhausted` instead of looping.
    #[test]
    fn exhausted_scan_terminates() {
        let mut t = small(3, GrowthPolicy::WhenFull);
        t.insert("a", "1").unwrap();
        let head = match t.buckets.slots.iter().find(|s| matches!(s, Slot::Chain(_))) {
            Some(Slot::Chain(h)) => *h,
            _ => unreachable!(),
        };
        for slot in t.buckets.slots.iter_mut() {
            *slot = Slot::Chain(head);
        }
        assert_eq!(t.buckets.locate(&t.entries, "b"), Probe::Exhausted);
        assert_eq!(t.head("b"), None);
        match t.insert("b", "2") {
            Err(Error::TableFull { capacity: 3 }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Invariant: iteration visits slot order first, chain order second,
    /// and yields every stored value once.
    #[test]
    fn iter_walks_slots_then_chains() {
        let mut t = small(101, GrowthPolicy::default());
        t.insert("a", "1").unwrap();
        t.insert("a", "2").unwrap();
        t.insert("b", "3").unwrap();
        let pairs: Vec<_> = t.iter().collect();
        assert_eq!(pairs.len(), 3);
        let a: Vec<_> = pairs.iter().filter(|(k, _)| *k == "a").map(|(_, v)| *v).collect();
        assert_eq!(a, ["2", "1"]);
    }
}
