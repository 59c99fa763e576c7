//! Random primitives the producers are built from.
//!
//! None of these hold state; the random source is always passed in.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::trace;

use crate::{Error, Result};

/// Draws made by [`sample_excluding`] before giving up.
pub const EXCLUSION_ATTEMPTS: u32 = 1000;

/// Uniform integer in `[min, max)`. Returns `min` when the range is empty.
pub fn sample_int<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform pick from `items`.
pub fn choose<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Result<&'a T> {
    items.choose(rng).ok_or(Error::EmptyInput)
}

/// Calls `producer` `count` times and concatenates the results in call order.
pub fn repeat<F>(count: u32, mut producer: F) -> Result<String>
where
    F: FnMut() -> Result<String>,
{
    let mut out = String::new();
    for _ in 0..count {
        out.push_str(&producer()?);
    }
    Ok(out)
}

/// Integer in `[0, max_value]` for which `excluded` is false, by rejection
/// sampling.
///
/// Fails after [`EXCLUSION_ATTEMPTS`] rejected draws, so a dense enough
/// exclusion can fail even when a valid value exists.
pub fn sample_excluding<R, F>(rng: &mut R, excluded: F, max_value: u32) -> Result<u32>
where
    R: Rng + ?Sized,
    F: Fn(u32) -> bool,
{
    for _ in 0..EXCLUSION_ATTEMPTS {
        let value = rng.random_range(0..=max_value);
        if !excluded(value) {
            return Ok(value);
        }
    }
    trace!(max_value, attempts = EXCLUSION_ATTEMPTS, "exclusion sampling exhausted");
    Err(Error::UnsatisfiableExclusion {
        attempts: EXCLUSION_ATTEMPTS,
        max_value,
    })
}
