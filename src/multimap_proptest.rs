#![cfg(test)]

// Property tests for MultiMap kept inside the crate so they can check the
// table's private invariants after every step.

use crate::config::{Config, GrowthPolicy};
use crate::multimap::MultiMap;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, String),
    Delete(usize),
    Search(usize),
    MultiSearch(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[A-Z]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), "[a-z]{0,3}").prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => idx.clone().prop_map(OpI::Search),
            1 => idx.clone().prop_map(OpI::MultiSearch),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[A-Z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Model: each key owns a Vec whose last element is the newest value.
fn run_against_model(mut sut: MultiMap, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, Vec<String>> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = &pool[i];
                let stored = sut.insert(k, &v).expect("insert never exhausts the table");
                let expect_stored = !k.is_empty() && !v.is_empty();
                prop_assert_eq!(stored, expect_stored);
                if expect_stored {
                    model.entry(k.clone()).or_default().push(v);
                }
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let expected = model.get_mut(k).and_then(Vec::pop);
                if model.get(k).is_some_and(Vec::is_empty) {
                    model.remove(k);
                }
                prop_assert_eq!(sut.delete(k), expected);
            }
            OpI::Search(i) => {
                let k = &pool[i];
                let expected = model.get(k).and_then(|vs| vs.last()).map(String::as_str);
                prop_assert_eq!(sut.search(k), expected);
            }
            OpI::MultiSearch(i) => {
                let k = &pool[i];
                match (sut.multi_search(k), model.get(k)) {
                    (Some(values), Some(vs)) => {
                        prop_assert_eq!(values.len(), vs.len());
                        let got: Vec<&str> = values.collect();
                        let want: Vec<&str> = vs.iter().rev().map(String::as_str).collect();
                        prop_assert_eq!(got, want);
                    }
                    (None, None) => {}
                    (got, want) => {
                        prop_assert!(false, "presence mismatch: {:?} vs {:?}", got.map(|v| v.len()), want);
                    }
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                // Per-key order must be newest first; cross-key order is unspecified.
                let mut seen: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for (k, v) in sut.iter() {
                    seen.entry(k).or_default().push(v);
                }
                let want: BTreeMap<&str, Vec<&str>> = model
                    .iter()
                    .map(|(k, vs)| (k.as_str(), vs.iter().rev().map(String::as_str).collect()))
                    .collect();
                prop_assert_eq!(seen, want);
                prop_assert_eq!(sut.serialize().is_empty(), model.is_empty());
            }
        }

        // Post-conditions after each op
        sut.assert_invariants();
        prop_assert_eq!(sut.count(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.value_count(), model.values().map(Vec::len).sum::<usize>());
    }
    Ok(())
}

// Property: State-machine equivalence against a HashMap<String, Vec<String>> model.
// Invariants exercised across random operation sequences:
// - LIFO: `search` is the newest value, `multi_search` lists newest first.
// - `count` equals the number of keys with ≥1 value; `delete` pops one value.
// - Empty keys/values are ignored.
// - Table structure (prime capacity, chain/count agreement) holds after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(MultiMap::new(), pool, ops)?;
    }
}

// Property: Same invariants on a tiny table, where primaries collide, probes
// wrap around, tombstones accumulate and growth happens mid-sequence.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_small_table((pool, ops) in arb_scenario()) {
        let sut = MultiMap::with_config(Config::default().initial_capacity(2));
        run_against_model(sut, pool, ops)?;
    }
}

// Property: Same invariants when the table only grows once completely full.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_when_full((pool, ops) in arb_scenario()) {
        let sut = MultiMap::with_config(
            Config::default()
                .initial_capacity(3)
                .growth_policy(GrowthPolicy::WhenFull),
        );
        run_against_model(sut, pool, ops)?;
    }
}
