//! Compiles a syntax tree into a tree of producers.
//!
//! Every node is compiled exactly once, eagerly, into a boxed closure over
//! its already-compiled children. Generation only invokes closures; it never
//! looks at the syntax tree again.

use rand::Rng;
use regen_syntax::{Bound, Flags, Node, NodeKind, Quantifier, Span};
use tracing::{trace, warn};

use crate::chars::CharSource;
use crate::config::{Config, UnsupportedPolicy};
use crate::context::BuildContext;
use crate::random;
use crate::Result;

/// Compiled form of one node: emits a matching fragment on each call.
pub type Producer = Box<dyn Fn(&mut BuildContext<'_>) -> Result<String> + Send + Sync>;

/// A construct the engine does not generate for, replaced by the fallback
/// producer of [`UnsupportedPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported {
    pub kind: &'static str,
    pub span: Span,
}

pub struct Compiler<'c> {
    config: &'c Config,
    ignore_case: bool,
    unsupported: Vec<Unsupported>,
}

impl<'c> Compiler<'c> {
    pub fn new(config: &'c Config, flags: Flags) -> Self {
        Self {
            config,
            ignore_case: flags.ignore_case,
            unsupported: Vec::new(),
        }
    }

    /// Unsupported constructs met so far, in compile order.
    pub fn unsupported(&self) -> &[Unsupported] {
        &self.unsupported
    }

    pub fn into_unsupported(self) -> Vec<Unsupported> {
        self.unsupported
    }

    pub fn compile(&mut self, node: &Node) -> Producer {
        let repeat = Repeat::new(node.quantifier, self.config.infinity_bound);

        match &node.kind {
            NodeKind::Disjunction(alternatives) => {
                let branches: Vec<Producer> =
                    alternatives.iter().map(|n| self.compile(n)).collect();
                Box::new(move |ctx| {
                    let branch = random::choose(ctx.rng(), &branches)?;
                    branch(ctx)
                })
            }

            NodeKind::Alternative(terms) => {
                let terms: Vec<Producer> = terms.iter().map(|n| self.compile(n)).collect();
                Box::new(move |ctx| terms.iter().map(|term| term(ctx)).collect())
            }

            NodeKind::Character(c) => self.compile_chars(CharSource::Literal(*c), repeat),

            NodeKind::Set { items, complement } => {
                let source = CharSource::set(
                    items,
                    *complement,
                    self.ignore_case,
                    self.config.code_point_ceiling(),
                );
                self.compile_chars(source, repeat)
            }

            NodeKind::Group {
                child,
                capturing,
                index,
            } => {
                let index = index.filter(|_| *capturing);
                // Every capture of the group, its own included, restarts on
                // each iteration.
                let nested: Vec<u32> = node.capture_indices();
                let child = self.compile(child);
                Box::new(move |ctx| {
                    let count = repeat.sample(ctx);
                    random::repeat(count, || {
                        ctx.clear_groups(&nested);
                        let text = child(ctx)?;
                        if let Some(index) = index {
                            ctx.set_group(index, text.clone());
                        }
                        Ok(text)
                    })
                })
            }

            NodeKind::GroupBackReference(index) => {
                let index = *index;
                Box::new(move |ctx| {
                    let count = repeat.sample(ctx);
                    let Some(text) = ctx.group(index) else {
                        trace!(index, "backreference to a group that has not run");
                        return Ok(String::new());
                    };
                    Ok(text.repeat(count as usize))
                })
            }

            NodeKind::StartAnchor | NodeKind::EndAnchor => Box::new(|_| Ok(String::new())),

            NodeKind::WordBoundary
            | NodeKind::NonWordBoundary
            | NodeKind::Lookahead(_)
            | NodeKind::NegativeLookahead(_)
            | NodeKind::Lookbehind(_)
            | NodeKind::NegativeLookbehind(_)
            | NodeKind::NamedGroup { .. }
            | NodeKind::NamedBackReference(_)
            | NodeKind::UnicodeProperty { .. } => self.compile_unsupported(node),
        }
    }

    fn compile_chars(&self, source: CharSource, repeat: Repeat) -> Producer {
        let ignore_case = self.ignore_case;
        Box::new(move |ctx| {
            let count = repeat.sample(ctx);
            random::repeat(count, || {
                source.emit(ctx.rng(), ignore_case).map(String::from)
            })
        })
    }

    fn compile_unsupported(&mut self, node: &Node) -> Producer {
        let kind = node.kind.name();
        warn!(
            kind,
            start = node.span.start,
            end = node.span.end,
            "unsupported construct, generating fallback"
        );
        self.unsupported.push(Unsupported {
            kind,
            span: node.span,
        });

        match self.config.unsupported {
            UnsupportedPolicy::Empty => Box::new(|_| Ok(String::new())),
            UnsupportedPolicy::KindName => Box::new(move |_| Ok(kind.to_string())),
        }
    }
}

/// Repeat count of a node, sampled anew on every invocation.
///
/// Finite bounds are taken as written, so `a{100000000}` builds a string of
/// that length on every call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Repeat {
    quantifier: Option<Quantifier>,
    infinity_bound: u32,
}

impl Repeat {
    pub(crate) fn new(quantifier: Option<Quantifier>, infinity_bound: u32) -> Self {
        Self {
            quantifier,
            infinity_bound,
        }
    }

    /// `[at_least, at_most]` with an unbounded `at_most` made concrete.
    /// Never below `at_least`, so `a{30,}` still yields 30 repetitions.
    fn bounds(self) -> (u32, u32) {
        let Some(quantifier) = self.quantifier else {
            return (1, 1);
        };
        let at_most = match quantifier.at_most {
            Bound::Finite(n) => n,
            Bound::Unbounded => self.infinity_bound.max(quantifier.at_least),
        };
        (quantifier.at_least, at_most)
    }

    pub(crate) fn sample(self, ctx: &mut BuildContext<'_>) -> u32 {
        let (at_least, at_most) = self.bounds();
        if self.quantifier.is_none() || at_least == at_most {
            return at_least;
        }
        match at_most.checked_add(1) {
            Some(end) => random::sample_int(ctx.rng(), at_least, end),
            None => ctx.rng().random_range(at_least..=at_most),
        }
    }
}
