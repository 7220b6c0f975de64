use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

fn validate_tree<K: Ord, V>(t: &AnyTree<K, V>) {
    match t {
        AnyTree::Unbalanced(t) => {
            t.validate();
        }
        AnyTree::Avl(t) => t.validate(),
        AnyTree::RedBlack(t) => {
            t.validate();
        }
    }
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 3)]
    Upsert(#[proptest(strategy = "0u16..512")] u16, u32),
    Get(#[proptest(strategy = "0u16..512")] u16),
}

fn backend_strategy() -> impl Strategy<Value = Backend> {
    prop_oneof![
        Just(Backend::Unbalanced),
        Just(Backend::Avl),
        Just(Backend::RedBlack),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence_with_btreemap(
        backend in backend_strategy(),
        ops in prop::collection::vec(any::<Op>(), 0..=1500),
    ) {
        let mut t: AnyTree<u16, u32> = AnyTree::new(backend);
        let mut m: BTreeMap<u16, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Upsert(key, value) => {
                    let old_t = t.upsert(key, value).unwrap();
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
            }
            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(u16, u32)> = t.in_order().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u32)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_invariants_hold_after_every_upsert(
        keys in prop::collection::vec(any::<i32>(), 0..=300),
    ) {
        let mut avl: AvlTree<i32, ()> = AvlTree::new();
        let mut rb: RbTree<i32, ()> = RbTree::new();
        for key in keys {
            avl.upsert(key, ()).unwrap();
            rb.upsert(key, ()).unwrap();
            avl.validate();
            rb.validate();
        }
    }

    #[test]
    fn prop_string_keys_in_order(
        backend in backend_strategy(),
        keys in prop::collection::vec("[a-zA-Z0-9-]{1,12}", 0..=200),
    ) {
        let mut t: AnyTree<String, usize> = AnyTree::new(backend);
        for (i, key) in keys.iter().enumerate() {
            t.upsert(key.clone(), i).unwrap();
        }
        validate_tree(&t);

        let walked: Vec<&String> = t.in_order().map(|(k, _)| k).collect();
        prop_assert!(walked.windows(2).all(|w| w[0] < w[1]));
        for key in &keys {
            // Last write wins.
            let last = keys.iter().rposition(|k| k == key).unwrap();
            prop_assert_eq!(t.get(key.as_str()), Some(&last));
        }
        prop_assert_eq!(t.get("never inserted key"), None);
    }

    #[test]
    fn prop_bst_overwrite_keeps_shape(
        keys in prop::collection::vec(0u32..1000, 1..=200),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut t: BstTree<u32, u32> = BstTree::new();
        for &k in &keys {
            t.upsert(k, 0).unwrap();
        }
        let shape: Vec<u32> = t.shape().into_iter().copied().collect();
        let len = t.len();

        let key = keys[pick.index(keys.len())];
        prop_assert_eq!(t.upsert(key, 1).unwrap(), Some(0));

        let after: Vec<u32> = t.shape().into_iter().copied().collect();
        prop_assert_eq!(shape, after);
        prop_assert_eq!(t.len(), len);
        prop_assert_eq!(t.get(&key), Some(&1));
    }

    #[test]
    fn prop_heap_matches_binary_heap(
        ops in prop::collection::vec(prop::option::weighted(0.7, any::<i16>()), 0..=1000),
    ) {
        // `Some(x)` pushes, `None` pops.
        let mut h = MinHeap::new(|a: &i16, b: &i16| a.cmp(b));
        let mut model: BinaryHeap<Reverse<i16>> = BinaryHeap::new();

        for op in ops {
            match op {
                Some(x) => {
                    h.push(x);
                    model.push(Reverse(x));
                }
                None => {
                    prop_assert_eq!(h.try_pop(), model.pop().map(|Reverse(x)| x));
                }
            }
            prop_assert_eq!(h.len(), model.len());
            h.validate();
        }

        let drained: Vec<i16> = h.drain_sorted().collect();
        prop_assert!(drained.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn prop_bulk_load_equals_sequential_push(
        items in prop::collection::vec((0u8..16, any::<u16>()), 0..=500),
    ) {
        // Compare on the first component only so equal-priority elements exist.
        let cmp = |a: &(u8, u16), b: &(u8, u16)| a.0.cmp(&b.0);

        let mut bulk = MinHeap::new(cmp);
        bulk.push_range(items.iter().copied());
        bulk.validate();

        let mut seq = MinHeap::new(cmp);
        for &item in &items {
            seq.push(item);
        }

        let from_bulk: Vec<u8> = bulk.drain_sorted().map(|(p, _)| p).collect();
        let from_seq: Vec<u8> = seq.drain_sorted().map(|(p, _)| p).collect();
        let mut expected: Vec<u8> = items.iter().map(|(p, _)| *p).collect();
        expected.sort();
        prop_assert_eq!(&from_bulk, &expected);
        prop_assert_eq!(&from_seq, &expected);
    }

    #[test]
    fn prop_urgency_is_a_total_order(
        a in record_strategy(),
        b in record_strategy(),
        c in record_strategy(),
    ) {
        prop_assert_eq!(urgency::compare(&a, &b), urgency::compare(&b, &a).reverse());
        prop_assert_eq!(urgency::compare(&a, &a), Ordering::Equal);
        if urgency::compare(&a, &b) != Ordering::Greater && urgency::compare(&b, &c) != Ordering::Greater {
            prop_assert_ne!(urgency::compare(&a, &c), Ordering::Greater);
        }
        if urgency::weight(a.status) < urgency::weight(b.status) {
            prop_assert_eq!(urgency::compare(&a, &b), Ordering::Less);
        }
    }

    #[test]
    fn prop_top_urgent_is_sorted_prefix(
        backend in backend_strategy(),
        records in prop::collection::vec(record_strategy(), 0..=120),
        k in 0usize..150,
    ) {
        let mut index = RecordIndex::with_backend(backend);
        index.build(records.clone());

        let mut latest: BTreeMap<String, TrackedRecord> = BTreeMap::new();
        for r in records {
            latest.insert(r.tracking_id.clone(), r);
        }
        let mut expected: Vec<TrackedRecord> = latest.into_values().collect();
        expected.sort_by(urgency::compare);
        expected.truncate(k);

        let got: Vec<Arc<TrackedRecord>> = index.top_urgent(k).collect();
        prop_assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(&expected) {
            prop_assert_eq!(&**g, e);
        }
    }

    #[test]
    fn prop_transition_follows_lifecycle_order(from in any::<Status>(), to in any::<Status>()) {
        const LIFECYCLE: [Status; 4] = [
            Status::Submitted,
            Status::InProgress,
            Status::Resolved,
            Status::Closed,
        ];
        let pos = |s: Status| LIFECYCLE.iter().position(|l| *l == s);
        let expected = match (pos(from), pos(to)) {
            (Some(f), Some(t)) => f <= t,
            _ => from == to,
        };
        prop_assert_eq!(is_legal_transition(from, to), expected);
    }
}

/// Records with unique-per-number, case-stable ids so urgency ties only occur
/// between writes of the same id.
fn record_strategy() -> impl Strategy<Value = TrackedRecord> {
    (0u16..200, any::<Status>(), 0i64..40, any::<Category>()).prop_map(
        |(n, status, minutes, category)| {
            let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
            TrackedRecord::new(
                format!("MC-{}-20250101-{n:04}", category.code()),
                status,
                t0 + Duration::minutes(minutes),
                category,
            )
        },
    )
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys = ["a", "b", "c", "aa", "ab", "ba", "MC"];

    for backend in Backend::ALL {
        for_each_permutation(&keys, |perm| {
            let mut t: AnyTree<String, u64> = AnyTree::new(backend);
            let mut m: BTreeMap<String, u64> = BTreeMap::new();

            for (i, k) in perm.into_iter().enumerate() {
                let v = i as u64;
                assert_eq!(t.upsert(k.to_string(), v).unwrap(), m.insert(k.to_string(), v));
                validate_tree(&t);
            }

            let got: Vec<(String, u64)> = t.in_order().map(|(k, v)| (k.clone(), *v)).collect();
            let expected: Vec<(String, u64)> = m.into_iter().collect();
            assert_eq!(got, expected);
        });
    }
}

#[test]
fn shuffled_bulk_insert_heights() {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut keys: Vec<u32> = (0..50_000).collect();
    keys.shuffle(&mut rand::rngs::StdRng::seed_from_u64(0x5eed));

    for backend in Backend::ALL {
        let mut t: AnyTree<u32, u32> = AnyTree::new(backend);
        for &k in &keys {
            t.upsert(k, k).unwrap();
        }
        validate_tree(&t);
        assert_eq!(t.len(), 50_000);
        assert!(t.in_order().map(|(k, _)| *k).eq(0..50_000));
        match backend {
            // Random order keeps even the plain BST shallow in practice.
            Backend::Unbalanced => assert!(t.height() < 100, "{backend}: {}", t.height()),
            Backend::Avl => assert!(t.height() <= 23, "{backend}: {}", t.height()),
            Backend::RedBlack => assert!(t.height() <= 32, "{backend}: {}", t.height()),
        }
    }
}
