use std::cell::Cell;
use std::collections::BTreeSet;

use crate::Error;
use crate::random::{EXCLUSION_ATTEMPTS, choose, repeat, sample_excluding, sample_int};
use crate::test_utils::seeded;

#[test]
fn sample_int_stays_in_half_open_range() {
    let mut rng = seeded(1);
    let seen: BTreeSet<u32> = (0..1000).map(|_| sample_int(&mut rng, 3, 7)).collect();
    assert_eq!(seen, BTreeSet::from([3, 4, 5, 6]));
}

#[test]
fn sample_int_empty_range_returns_min() {
    let mut rng = seeded(1);
    assert_eq!(sample_int(&mut rng, 5, 5), 5);
    assert_eq!(sample_int(&mut rng, 9, 2), 9);
}

#[test]
fn choose_covers_every_item() {
    let mut rng = seeded(2);
    let items = ["a", "b", "c"];
    let seen: BTreeSet<&str> = (0..300)
        .map(|_| *choose(&mut rng, &items).unwrap())
        .collect();
    assert_eq!(seen.len(), 3);
}

#[test]
fn choose_from_nothing_fails() {
    let mut rng = seeded(2);
    let items: [u8; 0] = [];
    assert_eq!(choose(&mut rng, &items), Err(Error::EmptyInput));
}

#[test]
fn repeat_concatenates_in_call_order() {
    let calls = Cell::new(0);
    let out = repeat(3, || {
        calls.set(calls.get() + 1);
        Ok(calls.get().to_string())
    })
    .unwrap();
    assert_eq!(out, "123");
}

#[test]
fn repeat_zero_never_calls_producer() {
    let out = repeat(0, || panic!("producer must not run")).unwrap();
    assert_eq!(out, "");
}

#[test]
fn repeat_stops_at_first_error() {
    let calls = Cell::new(0);
    let result = repeat(5, || {
        calls.set(calls.get() + 1);
        if calls.get() == 2 {
            Err(Error::EmptyInput)
        } else {
            Ok("x".to_string())
        }
    });
    assert_eq!(result, Err(Error::EmptyInput));
    assert_eq!(calls.get(), 2);
}

#[test]
fn sample_excluding_avoids_excluded_values() {
    let mut rng = seeded(3);
    for _ in 0..500 {
        let value = sample_excluding(&mut rng, |v| v % 2 == 0, 10).unwrap();
        assert!(value % 2 == 1 && value <= 10);
    }
}

#[test]
fn sample_excluding_reaches_max_value() {
    let mut rng = seeded(3);
    let hit = (0..200).any(|_| sample_excluding(&mut rng, |v| v < 4, 4).unwrap() == 4);
    assert!(hit);
}

#[test]
fn sample_excluding_everything_fails() {
    let mut rng = seeded(4);
    let result = sample_excluding(&mut rng, |_| true, 100);
    assert_eq!(
        result,
        Err(Error::UnsatisfiableExclusion {
            attempts: EXCLUSION_ATTEMPTS,
            max_value: 100
        })
    );
}
