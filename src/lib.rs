//! rhyme-map: a string multi-value hash map, and a homophone finder that
//! indexes a pronouncing dictionary with two of them.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a map where one key owns a newest-first stack of values, with
//!   O(1) average insert, lookup of the newest value, and removal of the
//!   newest value.
//! - Layers:
//!   - `hash`: `djb2` (primary slot), `sdbm` (probe offset) and prime
//!     helpers.
//!   - `table::ProbeTable`: prime-sized slot array; each slot is empty, a
//!     tombstone, or the head of a chain of entries sharing one key.
//!     Entries live in a `slotmap` arena and link by arena key.
//!   - `MultiMap`: public API; validates input and forwards to the table.
//!   - `dictionary`, `phonemes`, `homophones`: the pronouncing-dictionary
//!     reader and the two-map homophone index built on `MultiMap`.
//!
//! Probing
//! - A new key goes to its primary slot if free, else to the first free
//!   slot of a linear scan starting at `(sdbm mod cap + primary) mod cap`.
//! - A repeated key finds its slot by the same walk and prepends, so
//!   distinct keys never share a chain.
//! - Every walk is bounded by the capacity.
//!
//! Deletion
//! - Only the newest value of a key is removed. When a chain empties, its
//!   slot becomes a tombstone: lookups walk past it so keys displaced by the
//!   deleted one stay reachable, and inserts reuse it.
//!
//! Growth
//! - Checked after every insert. By default the table grows to
//!   `next_prime(capacity * 5)` once 75% of slots hold chains, and is
//!   rebuilt at the same capacity once chains plus tombstones reach 75%.
//!   `GrowthPolicy::WhenFull` instead waits until every slot is used.
//! - A rehash places each chain once by its head key and carries the slot's
//!   value count with it; the new slot array replaces the old one only
//!   after every chain has been placed.
//!
//! Notes and non-goals
//! - Single-threaded: no interior mutability; wrap in a lock to share.
//! - Keys and values are `String`s; there is no generic variant.
//! - No removal of a specific value among several for one key.
//! - No ordering across distinct keys.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod hash;
pub mod homophones;
pub mod multimap;
mod multimap_proptest;
pub mod phonemes;
mod table;

// Public surface
pub use config::{Config, GrowthPolicy};
pub use error::{Error, Result};
pub use homophones::{HomophoneIndex, Homophones};
pub use multimap::{MultiMap, Values};
