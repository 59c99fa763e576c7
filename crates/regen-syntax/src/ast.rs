//! Syntax tree produced by the parser.
//!
//! The tree is immutable once parsed. Every node carries its byte span in the
//! pattern source and an optional quantifier; the parser never attaches a
//! quantifier to a `Disjunction`, an `Alternative` or an assertion.

use std::fmt;

use crate::flags::Flags;

/// Byte range into the pattern source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// Upper bound of a quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Finite(u32),
    /// `*`, `+` and `{n,}`. Only made concrete when a repeat count is sampled.
    Unbounded,
}

/// Repetition attached to a node: `{at_least, at_most}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Quantifier {
    pub at_least: u32,
    pub at_most: Bound,
    /// `false` for the lazy forms (`*?`, `{2,3}?`). Irrelevant for generation.
    pub greedy: bool,
}

impl Quantifier {
    pub fn new(at_least: u32, at_most: Bound) -> Self {
        Self {
            at_least,
            at_most,
            greedy: true,
        }
    }

    /// `?`
    pub fn optional() -> Self {
        Self::new(0, Bound::Finite(1))
    }

    /// `*`
    pub fn zero_or_more() -> Self {
        Self::new(0, Bound::Unbounded)
    }

    /// `+`
    pub fn one_or_more() -> Self {
        Self::new(1, Bound::Unbounded)
    }

    /// `{n}`
    pub fn exactly(n: u32) -> Self {
        Self::new(n, Bound::Finite(n))
    }

    pub fn lazy(mut self) -> Self {
        self.greedy = false;
        self
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.at_most {
            Bound::Finite(n) if n == self.at_least => write!(f, "{{{n}}}")?,
            Bound::Finite(n) => write!(f, "{{{},{n}}}", self.at_least)?,
            Bound::Unbounded => write!(f, "{{{},}}", self.at_least)?,
        }
        if !self.greedy {
            f.write_str("?")?;
        }
        Ok(())
    }
}

/// One member of a character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetItem {
    Char(char),
    /// Inclusive on both ends, `from <= to`.
    Range { from: char, to: char },
}

impl SetItem {
    pub fn range(from: char, to: char) -> Self {
        if from == to {
            Self::Char(from)
        } else {
            Self::Range { from, to }
        }
    }

    pub fn bounds(self) -> (char, char) {
        match self {
            Self::Char(c) => (c, c),
            Self::Range { from, to } => (from, to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `a|b|c`. Always has at least one alternative.
    Disjunction(Vec<Node>),
    /// A sequence of terms, possibly empty.
    Alternative(Vec<Node>),
    Character(char),
    /// `[...]`, `[^...]`, `.` and the class escapes (`\d`, `\W`, ...).
    Set {
        items: Vec<SetItem>,
        complement: bool,
    },
    /// `(...)` and `(?:...)`. `index` is present iff the group captures.
    Group {
        child: Box<Node>,
        capturing: bool,
        index: Option<u32>,
    },
    /// `\1`, `\2`, ...
    GroupBackReference(u32),
    StartAnchor,
    EndAnchor,
    WordBoundary,
    NonWordBoundary,
    Lookahead(Box<Node>),
    NegativeLookahead(Box<Node>),
    Lookbehind(Box<Node>),
    NegativeLookbehind(Box<Node>),
    /// `(?<name>...)`. Takes a capture index like any capturing group.
    NamedGroup {
        name: String,
        index: u32,
        child: Box<Node>,
    },
    /// `\k<name>`
    NamedBackReference(String),
    /// `\p{...}` and `\P{...}` under the `u` flag.
    UnicodeProperty { name: String, negated: bool },
}

impl NodeKind {
    /// Bare name of the kind, as used in dumps and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Disjunction(_) => "Disjunction",
            Self::Alternative(_) => "Alternative",
            Self::Character(_) => "Character",
            Self::Set { .. } => "Set",
            Self::Group { .. } => "Group",
            Self::GroupBackReference(_) => "GroupBackReference",
            Self::StartAnchor => "StartAnchor",
            Self::EndAnchor => "EndAnchor",
            Self::WordBoundary => "WordBoundary",
            Self::NonWordBoundary => "NonWordBoundary",
            Self::Lookahead(_) => "Lookahead",
            Self::NegativeLookahead(_) => "NegativeLookahead",
            Self::Lookbehind(_) => "Lookbehind",
            Self::NegativeLookbehind(_) => "NegativeLookbehind",
            Self::NamedGroup { .. } => "NamedGroup",
            Self::NamedBackReference(_) => "NamedBackReference",
            Self::UnicodeProperty { .. } => "UnicodeProperty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub quantifier: Option<Quantifier>,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self {
            kind,
            quantifier: None,
            span,
        }
    }

    pub fn with_quantifier(mut self, quantifier: Quantifier) -> Self {
        self.quantifier = Some(quantifier);
        self
    }

    /// Direct children, in source order.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Disjunction(nodes) | NodeKind::Alternative(nodes) => nodes,
            NodeKind::Group { child, .. }
            | NodeKind::NamedGroup { child, .. }
            | NodeKind::Lookahead(child)
            | NodeKind::NegativeLookahead(child)
            | NodeKind::Lookbehind(child)
            | NodeKind::NegativeLookbehind(child) => std::slice::from_ref(child),
            _ => &[],
        }
    }

    /// Capture indices of every capturing group in this subtree, including
    /// the node itself.
    pub fn capture_indices(&self) -> Vec<u32> {
        let mut out = Vec::new();
        self.collect_capture_indices(&mut out);
        out
    }

    fn collect_capture_indices(&self, out: &mut Vec<u32>) {
        match &self.kind {
            NodeKind::Group {
                index: Some(index), ..
            } => out.push(*index),
            NodeKind::NamedGroup { index, .. } => out.push(*index),
            _ => {}
        }
        for child in self.children() {
            child.collect_capture_indices(out);
        }
    }
}

/// A parsed pattern: the tree plus everything needed to interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub root: Node,
    pub flags: Flags,
    /// Number of capturing groups, named ones included.
    pub group_count: u32,
    pub source: String,
}
