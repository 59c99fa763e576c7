//! Public entry point: a compiled pattern that produces matching strings.

use std::fmt;

use rand::RngCore;
use regen_syntax::{Flags, Parser, Pattern};
use tracing::debug;

use crate::compile::{Compiler, Producer, Unsupported};
use crate::config::Config;
use crate::context::BuildContext;
use crate::Result;

/// A pattern compiled for generation.
///
/// Immutable after construction and safe to share between threads; every
/// [`build`](Self::build) call works on its own [`BuildContext`].
pub struct Generator {
    pattern: Pattern,
    config: Config,
    root: Producer,
    unsupported: Vec<Unsupported>,
}

impl Generator {
    /// Compile `pattern` with no flags and the default [`Config`].
    pub fn new(pattern: &str) -> Result<Self> {
        Self::builder(pattern).build()
    }

    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Self> {
        Self::builder(pattern).flags(flags).build()
    }

    /// Compile a pattern literal such as `/[a-f]{4}/i`.
    pub fn from_literal(literal: &str) -> Result<Self> {
        GeneratorBuilder::from_literal(literal).build()
    }

    pub fn builder(pattern: &str) -> GeneratorBuilder<'_> {
        GeneratorBuilder::new(pattern)
    }

    fn compile(pattern: Pattern, config: Config) -> Self {
        let mut compiler = Compiler::new(&config, pattern.flags);
        let root = compiler.compile(&pattern.root);
        let unsupported = compiler.into_unsupported();
        debug!(
            pattern = %pattern.source,
            flags = %pattern.flags,
            groups = pattern.group_count,
            unsupported = unsupported.len(),
            "compiled generator"
        );
        Self {
            pattern,
            config,
            root,
            unsupported,
        }
    }

    /// One matching string, drawn from the thread-local random source.
    pub fn build(&self) -> Result<String> {
        self.build_with(&mut rand::rng())
    }

    /// One matching string, drawn from `rng`. A seeded `rng` makes the
    /// output reproducible.
    pub fn build_with<R: RngCore>(&self, rng: &mut R) -> Result<String> {
        let mut ctx = BuildContext::new(rng);
        (self.root)(&mut ctx)
    }

    /// Unbounded stream of matching strings drawn from `rng`.
    pub fn samples<R: RngCore>(&self, rng: R) -> Samples<'_, R> {
        Samples {
            generator: self,
            rng,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn flags(&self) -> Flags {
        self.pattern.flags
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn group_count(&self) -> u32 {
        self.pattern.group_count
    }

    /// Constructs that were compiled to the fallback producer. Output of a
    /// generator with any of these is not guaranteed to match.
    pub fn unsupported(&self) -> &[Unsupported] {
        &self.unsupported
    }

    pub fn is_fully_supported(&self) -> bool {
        self.unsupported.is_empty()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("pattern", &self.pattern.source)
            .field("flags", &self.pattern.flags)
            .field("config", &self.config)
            .field("unsupported", &self.unsupported)
            .finish_non_exhaustive()
    }
}

impl TryFrom<&str> for Generator {
    type Error = crate::Error;

    fn try_from(pattern: &str) -> Result<Self> {
        Self::new(pattern)
    }
}

/// Builder for a [`Generator`] with non-default flags or configuration.
#[derive(Debug, Clone)]
pub struct GeneratorBuilder<'p> {
    source: &'p str,
    literal: bool,
    flags: Flags,
    config: Config,
}

impl<'p> GeneratorBuilder<'p> {
    pub fn new(source: &'p str) -> Self {
        Self {
            source,
            literal: false,
            flags: Flags::default(),
            config: Config::default(),
        }
    }

    /// Start from a pattern literal such as `/[a-f]{4}/i`. The flags are
    /// taken from the literal; [`flags`](Self::flags) is ignored.
    pub fn from_literal(literal: &'p str) -> Self {
        Self {
            literal: true,
            ..Self::new(literal)
        }
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Generator> {
        let limit = self.config.recursion_limit;
        let pattern = if self.literal {
            regen_syntax::parse_literal_with_limit(self.source, limit)?
        } else {
            Parser::new(self.source, self.flags)
                .with_recursion_limit(limit)
                .parse()?
        };
        Ok(Generator::compile(pattern, self.config))
    }
}

/// Iterator returned by [`Generator::samples`]. Never ends.
pub struct Samples<'g, R> {
    generator: &'g Generator,
    rng: R,
}

impl<R: RngCore> Iterator for Samples<'_, R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generator.build_with(&mut self.rng))
    }
}
