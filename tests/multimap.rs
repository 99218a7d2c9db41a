// MultiMap integration tests against the public API.
//
// Each test documents the law being verified:
// - LIFO: values for one key come back newest first.
// - Count: `count` is the number of keys with ≥1 value.
// - Delete: each delete removes exactly one (the newest) value.
// - Round-trip: every stored pair is discoverable until deleted.
// - Capacity: capacity stays prime through growth.
use rhyme_map::{Config, GrowthPolicy, MultiMap};
use std::collections::HashSet;

fn is_prime(n: usize) -> bool {
    n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

// Test: the reverse-index scenario from a pronouncing dictionary.
// Verifies: newest-first order, value count and head lookup.
#[test]
fn reverse_index_scenario() {
    let mut words = MultiMap::new();
    let mut rhymes = MultiMap::new();

    words.insert("CHRISTMAS", "S M AH0 S").unwrap();
    rhymes.insert("S M AH0 S", "ISTHMUS").unwrap();
    rhymes.insert("S M AH0 S", "CHRISTMAS").unwrap();
    rhymes.insert("S M AH0 S", "CHRISTMAS'").unwrap();

    let phonemes = words.search("CHRISTMAS").expect("word indexed");
    assert_eq!(phonemes, "S M AH0 S");

    let values = rhymes.multi_search(phonemes).expect("suffix indexed");
    assert_eq!(values.len(), 3);
    assert_eq!(
        values.collect::<Vec<_>>(),
        ["CHRISTMAS'", "CHRISTMAS", "ISTHMUS"]
    );
    assert_eq!(rhymes.search("S M AH0 S"), Some("CHRISTMAS'"));
    assert_eq!(rhymes.count(), 1);
}

// Test: high fan-out under few keys, the shape of a phoneme reverse index.
// Verifies: LIFO per key, count law, value totals.
#[test]
fn many_values_under_few_keys() {
    let mut m = MultiMap::new();
    for i in 0..2_000 {
        let key = format!("suffix{}", i % 7);
        m.insert(&key, &format!("word{i}")).unwrap();
    }
    assert_eq!(m.count(), 7);
    assert_eq!(m.value_count(), 2_000);

    for k in 0..7 {
        let values: Vec<_> = m.multi_search(&format!("suffix{k}")).unwrap().collect();
        let expected: Vec<String> = (0..2_000)
            .rev()
            .filter(|i| i % 7 == k)
            .map(|i| format!("word{i}"))
            .collect();
        assert_eq!(values, expected);
    }
}

// Test: the delete law, down to the last value.
// Verifies: length shrinks by one per delete; key vanishes at zero.
#[test]
fn delete_law() {
    let mut m = MultiMap::new();
    m.insert("other", "x").unwrap();
    for v in ["1", "2", "3"] {
        m.insert("k", v).unwrap();
    }

    for (expected_value, remaining) in [("3", 2), ("2", 1)] {
        assert_eq!(m.delete("k").as_deref(), Some(expected_value));
        assert_eq!(m.multi_search("k").unwrap().len(), remaining);
        assert_eq!(m.count(), 2);
    }

    assert_eq!(m.delete("k").as_deref(), Some("1"));
    assert_eq!(m.search("k"), None);
    assert!(m.multi_search("k").is_none());
    assert_eq!(m.count(), 1);

    // The key can come back afterwards.
    m.insert("k", "4").unwrap();
    assert_eq!(m.search("k"), Some("4"));
    assert_eq!(m.count(), 2);
}

// Test: round-trip through growth, deletion and reinsertion on a small table.
// Verifies: every live pair stays discoverable; capacity stays prime.
#[test]
fn round_trip_through_growth_and_churn() {
    let mut m = MultiMap::with_config(Config::default().initial_capacity(3));
    let mut capacities = HashSet::new();

    for i in 0..3_000 {
        m.insert(&format!("key{}", i % 1_000), &format!("v{i}")).unwrap();
        capacities.insert(m.capacity());
        assert!(is_prime(m.capacity()));
        assert!(m.count() <= m.capacity());
    }
    assert!(capacities.len() > 1, "table never grew");

    // Drop the newest value of every even key, and every value of keys divisible by 10.
    for k in (0..1_000).step_by(2) {
        let key = format!("key{k}");
        let popped = m.delete(&key).unwrap();
        assert_eq!(popped, format!("v{}", 2_000 + k));
        if k % 10 == 0 {
            m.delete(&key).unwrap();
            m.delete(&key).unwrap();
            assert!(m.search(&key).is_none());
        }
    }
    assert_eq!(m.count(), 900);

    for k in 0..1_000 {
        let key = format!("key{k}");
        let found: Option<Vec<String>> = m
            .multi_search(&key)
            .map(|v| v.map(str::to_owned).collect());
        let expected: Option<Vec<String>> = match (k % 2, k % 10) {
            (_, 0) => None,
            (0, _) => Some(vec![format!("v{}", 1_000 + k), format!("v{k}")]),
            _ => Some(vec![
                format!("v{}", 2_000 + k),
                format!("v{}", 1_000 + k),
                format!("v{k}"),
            ]),
        };
        assert_eq!(found, expected, "{key}");
    }
}

// Test: serialization format.
// Verifies: one `[key](value)` token per value, newest first within a key.
#[test]
fn serialize_format() {
    let mut m = MultiMap::new();
    assert_eq!(m.serialize(), "");

    m.insert("S M AH0 S", "ISTHMUS").unwrap();
    m.insert("S M AH0 S", "CHRISTMAS").unwrap();
    assert_eq!(m.serialize(), "[S M AH0 S](CHRISTMAS) [S M AH0 S](ISTHMUS)");

    m.insert("K AE1 T", "CAT").unwrap();
    let s = m.serialize();
    assert!(s.contains("[K AE1 T](CAT)"));
    assert!(s.contains("[S M AH0 S](CHRISTMAS) [S M AH0 S](ISTHMUS)"));
    assert_eq!(s.len(), "[S M AH0 S](CHRISTMAS) [S M AH0 S](ISTHMUS) [K AE1 T](CAT)".len());
}

// Test: iteration agrees with serialize and visits every value once.
#[test]
fn iteration_matches_serialization() {
    let mut m = MultiMap::new();
    for (k, v) in [("a", "1"), ("b", "2"), ("a", "3"), ("c", "4")] {
        m.insert(k, v).unwrap();
    }
    let rendered: Vec<String> = (&m).into_iter().map(|(k, v)| format!("[{k}]({v})")).collect();
    assert_eq!(rendered.join(" "), m.serialize());
    assert_eq!(rendered.len(), m.value_count());
}

// Test: the integer-division growth mode keeps its capacity.
// Verifies: no growth below a full table; lookups still work near full load.
#[test]
fn when_full_growth_mode() {
    let mut m = MultiMap::with_config(
        Config::default()
            .initial_capacity(101)
            .growth_policy(GrowthPolicy::WhenFull),
    );
    for i in 0..100 {
        m.insert(&format!("w{i}"), "x").unwrap();
    }
    assert_eq!(m.capacity(), 101);
    for i in 0..100 {
        assert!(m.contains_key(&format!("w{i}")));
    }
    assert!(!m.contains_key("missing"));

    m.insert("w100", "x").unwrap();
    assert_eq!(m.capacity(), 509);
    assert_eq!(m.count(), 101);
}
