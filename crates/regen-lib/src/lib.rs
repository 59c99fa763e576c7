//! Regen: random strings that match a regular expression.
//!
//! A pattern is parsed once and compiled into a tree of producers. Every
//! call to [`Generator::build`] walks that tree with a fresh build context
//! and returns one matching string.
//!
//! # Example
//!
//! ```
//! use regen_lib::Generator;
//!
//! let generator = Generator::new(r"(\w+)-\1").unwrap();
//! let sample = generator.build().unwrap();
//! let (left, right) = sample.split_once('-').unwrap();
//! assert_eq!(left, right);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod compile;
pub mod config;
pub mod context;
pub mod generator;
pub mod random;

mod chars;

#[cfg(test)]
mod generator_tests;
#[cfg(test)]
mod random_tests;
#[cfg(test)]
mod test_utils;

pub use compile::{Compiler, Producer, Unsupported};
pub use config::{Config, UnsupportedPolicy};
pub use context::BuildContext;
pub use generator::{Generator, GeneratorBuilder, Samples};
pub use regen_syntax::{Flags, ParseError, ParseErrorKind};

/// Errors raised while constructing a generator or building a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The pattern or its flags did not parse. Only raised at construction.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A uniform choice was asked of an empty sequence, e.g. the empty set `[]`.
    #[error("cannot choose from an empty sequence")]
    EmptyInput,

    /// Rejection sampling for a complemented set ran out of attempts.
    #[error("no value in 0..={max_value} outside the excluded set after {attempts} attempts")]
    UnsatisfiableExclusion { attempts: u32, max_value: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
