mod common;

use std::collections::{BTreeMap, BTreeSet};

use bst_set::set_base::{
    iter::{ConstIterator, TreeIterator},
    DefaultSet, VerifiedSet, VerifiedSetConfig,
};
use common::init_logger;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

struct Workload {
    min: i32,
    max: i32,
    iterations: usize,
    p_insert: f64,
    p_erase: f64,
    p_compare: f64,
}

fn expect_same(c: &DefaultSet<i32>, expected: &BTreeSet<i32>) {
    assert_eq!(expected.len(), c.size());
    assert!(c.iter().eq(expected.iter()));
    assert!(c.iter().rev().eq(expected.iter().rev()));
}

fn run(seed: u64, w: &Workload) {
    log::info!("random ops, seed {}, keys {}..={}", seed, w.min, w.max);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut c = DefaultSet::<i32>::new();
    let mut expected = BTreeSet::new();

    for _ in 0..w.iterations {
        let key = rng.gen_range(w.min..=w.max);
        let roll: f64 = rng.gen();

        if roll < w.p_insert {
            let (it, inserted) = c.insert(key);
            assert_eq!(expected.insert(key), inserted);
            assert_eq!(key, *it.key());
        } else if roll < w.p_insert + w.p_erase {
            if rng.gen_bool(0.5) {
                assert_eq!(expected.remove(&key) as usize, c.erase(&key));
            } else {
                let it = c.find(&key);
                if it.is_end() {
                    assert!(!expected.contains(&key));
                } else {
                    let next = c.erase_at(it);
                    assert!(expected.remove(&key));
                    assert_eq!(expected.range(key..).next(), c.get(next));
                }
            }
        } else {
            assert_eq!(expected.contains(&key), c.exists(&key));
            assert_eq!(expected.range(key..).next(), c.get(c.lower_bound(&key)));
            assert_eq!(
                expected.range(key.saturating_add(1)..).next(),
                c.get(c.upper_bound(&key))
            );
        }

        if rng.gen_bool(w.p_compare) {
            expect_same(&c, &expected);
        }
    }

    expect_same(&c, &expected);
    assert!(c.verify().is_ok());

    let copy = c.clone();
    expect_same(&copy, &expected);
    let stats = c.get_stats();
    log::info!(
        "seed {}: {} keys, height {}, avg depth {:.2}",
        seed,
        stats.size,
        stats.height,
        stats.avg_depth()
    );
}

fn run_seeds(w: &Workload) {
    init_logger();
    for seed in 1337..=1342 {
        run(seed, w);
    }
}

#[test]
fn wide_range_insert_only() {
    run_seeds(&Workload {
        min: 1,
        max: 10_000,
        iterations: 10_000,
        p_insert: 0.5,
        p_erase: 0.0,
        p_compare: 0.1,
    });
}

#[test]
fn wide_range_mixed() {
    run_seeds(&Workload {
        min: 1,
        max: 10_000,
        iterations: 10_000,
        p_insert: 0.4,
        p_erase: 0.2,
        p_compare: 0.1,
    });
}

#[test]
fn wide_range_mostly_erase() {
    run_seeds(&Workload {
        min: 1,
        max: 10_000,
        iterations: 10_000,
        p_insert: 0.01,
        p_erase: 0.7,
        p_compare: 0.1,
    });
}

#[test]
fn narrow_range_insert_only() {
    run_seeds(&Workload {
        min: 1,
        max: 500,
        iterations: 100_000,
        p_insert: 0.5,
        p_erase: 0.0,
        p_compare: 0.01,
    });
}

#[test]
fn narrow_range_mixed() {
    run_seeds(&Workload {
        min: 1,
        max: 500,
        iterations: 100_000,
        p_insert: 0.4,
        p_erase: 0.2,
        p_compare: 0.01,
    });
}

#[test]
fn narrow_range_mostly_erase() {
    run_seeds(&Workload {
        min: 1,
        max: 500,
        iterations: 100_000,
        p_insert: 0.01,
        p_erase: 0.7,
        p_compare: 0.01,
    });
}

/// Cursors to every key must keep pointing at their key through any mix of
/// inserts and erases of other keys.
#[test]
fn cursors_survive_random_updates() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(42);
    let mut c = VerifiedSet::<i32>::new();
    let mut cursors = BTreeMap::new();

    for _ in 0..5_000 {
        let key = rng.gen_range(0..300);
        if rng.gen_bool(0.6) {
            let (it, inserted) = c.insert(key);
            if inserted {
                cursors.insert(key, it.as_const());
            } else {
                assert_eq!(cursors[&key], it);
            }
        } else if let Some(it) = cursors.remove(&key) {
            c.erase_at(it);
        }
    }

    assert_eq!(cursors.len(), c.size());
    let mut prev: Option<ConstIterator<VerifiedSetConfig<i32>>> = None;
    for (key, it) in &cursors {
        assert_eq!(key, it.key());
        assert_eq!(*it, c.find(key));
        if let Some(prev) = prev {
            assert_eq!(prev.next_pos(), *it);
        }
        prev = Some(*it);
    }
}

#[test]
fn sequential_sweep_against_btree() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut c = DefaultSet::<i32>::new();
    let mut expected = BTreeSet::new();
    let mut keys: Vec<i32> = (0..2_000).collect();
    keys.shuffle(&mut rng);
    for &k in &keys {
        c.insert(k);
        expected.insert(k);
    }
    keys.shuffle(&mut rng);
    for &k in keys.iter().take(1_500) {
        assert_eq!(1, c.erase(&k));
        expected.remove(&k);
        assert_eq!(expected.iter().next(), c.get(c.begin()));
        assert_eq!(expected.iter().next_back(), c.iter().next_back());
    }
    expect_same(&c, &expected);
}
