//! Character sources behind `Character` and `Set` nodes.
//!
//! Set items are normalized into a canonical, sorted list of disjoint ranges
//! with `regex-syntax`'s [`ClassUnicode`], so membership tests and uniform
//! draws never materialize the individual code points.

use rand::{Rng, RngCore};
use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};
use regen_syntax::SetItem;

use crate::random;
use crate::{Error, Result};

const SURROGATES: (u32, u32) = (0xD800, 0xDFFF);

/// Canonical code-point set supporting membership and uniform draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodePoints {
    /// Sorted, disjoint, inclusive; never spans a surrogate.
    ranges: Vec<(u32, u32)>,
    /// `ends[i]` is the number of code points in `ranges[..=i]`.
    ends: Vec<u32>,
}

impl CodePoints {
    pub(crate) fn from_class(class: &ClassUnicode) -> Self {
        let mut ranges = Vec::with_capacity(class.ranges().len());
        for range in class.ranges() {
            let (lo, hi) = (u32::from(range.start()), u32::from(range.end()));
            let (s_lo, s_hi) = SURROGATES;
            if lo < s_lo && hi > s_hi {
                ranges.push((lo, s_lo - 1));
                ranges.push((s_hi + 1, hi));
            } else {
                ranges.push((lo, hi));
            }
        }

        let mut ends = Vec::with_capacity(ranges.len());
        let mut total = 0u32;
        for &(lo, hi) in &ranges {
            total += hi - lo + 1;
            ends.push(total);
        }
        Self { ranges, ends }
    }

    pub(crate) fn len(&self) -> u32 {
        self.ends.last().copied().unwrap_or(0)
    }

    pub(crate) fn contains(&self, code_point: u32) -> bool {
        let idx = self.ranges.partition_point(|&(_, hi)| hi < code_point);
        self.ranges
            .get(idx)
            .is_some_and(|&(lo, _)| lo <= code_point)
    }

    /// Uniform draw over every member.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<char> {
        let total = self.len();
        if total == 0 {
            return Err(Error::EmptyInput);
        }
        let nth = random::sample_int(rng, 0, total);
        let idx = self.ends.partition_point(|&end| end <= nth);
        let (lo, hi) = self.ranges[idx];
        let before = self.ends[idx] - (hi - lo + 1);
        char::from_u32(lo + (nth - before)).ok_or(Error::EmptyInput)
    }
}

/// Builds the class covering `items`.
pub(crate) fn class_of(items: &[SetItem]) -> ClassUnicode {
    ClassUnicode::new(items.iter().map(|item| {
        let (from, to) = item.bounds();
        ClassUnicodeRange::new(from, to)
    }))
}

/// Where each emitted character of a `Character` or `Set` node comes from.
#[derive(Debug, Clone)]
pub(crate) enum CharSource {
    Literal(char),
    /// Uniform over the members of a set.
    Members(CodePoints),
    /// Anything in `[0, max_code_point]` outside `excluded`.
    Excluding {
        excluded: CodePoints,
        max_code_point: u32,
    },
}

impl CharSource {
    /// Source for a set node. Under `ignore_case` the exclusion of a
    /// complemented set is closed under simple case folding first.
    pub(crate) fn set(
        items: &[SetItem],
        complement: bool,
        ignore_case: bool,
        max_code_point: u32,
    ) -> Self {
        let mut class = class_of(items);
        if !complement {
            return Self::Members(CodePoints::from_class(&class));
        }
        if ignore_case {
            class.case_fold_simple();
        }
        Self::Excluding {
            excluded: CodePoints::from_class(&class),
            max_code_point,
        }
    }

    /// One character, case-randomized under `ignore_case`.
    pub(crate) fn emit(&self, rng: &mut dyn RngCore, ignore_case: bool) -> Result<char> {
        let c = match self {
            Self::Literal(c) => *c,
            Self::Members(points) => points.sample(rng)?,
            Self::Excluding {
                excluded,
                max_code_point,
            } => {
                let value = random::sample_excluding(
                    rng,
                    |v| is_surrogate(v) || excluded.contains(v),
                    *max_code_point,
                )?;
                char::from_u32(value).ok_or(Error::UnsatisfiableExclusion {
                    attempts: random::EXCLUSION_ATTEMPTS,
                    max_value: *max_code_point,
                })?
            }
        };
        Ok(if ignore_case { apply_case(rng, c) } else { c })
    }
}

fn is_surrogate(value: u32) -> bool {
    (SURROGATES.0..=SURROGATES.1).contains(&value)
}

/// Upper or lower case of `c` with probability 1/2 each.
///
/// Keeps `c` when the mapping is not a single character or crosses the
/// ASCII boundary (U+212A KELVIN SIGN to `k`, `ſ` to `S`).
pub(crate) fn apply_case<R: Rng + ?Sized>(rng: &mut R, c: char) -> char {
    let mapped = if rng.random_bool(0.5) {
        single(c.to_uppercase())
    } else {
        single(c.to_lowercase())
    };
    match mapped {
        Some(m) if m.is_ascii() == c.is_ascii() => m,
        _ => c,
    }
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}
