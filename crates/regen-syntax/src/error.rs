//! Parse errors and their rendering against the pattern source.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use crate::ast::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unterminated group")]
    UnclosedGroup,

    #[error("unmatched `)`")]
    UnmatchedParen,

    #[error("unterminated character class")]
    UnclosedClass,

    #[error("nothing to repeat")]
    NothingToRepeat,

    #[error("range out of order in character class")]
    RangeOutOfOrder,

    #[error("numbers out of order in quantifier")]
    QuantifierOutOfOrder,

    #[error("`\\` at end of pattern")]
    TrailingBackslash,

    #[error("invalid group")]
    InvalidGroup,

    #[error("invalid capture group name")]
    InvalidGroupName,

    #[error("lone surrogate U+{0:04X}")]
    LoneSurrogate(u32),

    #[error("invalid code point")]
    InvalidCodePoint,

    #[error("invalid flag `{0}`")]
    InvalidFlag(char),

    #[error("duplicate flag `{0}`")]
    DuplicateFlag(char),

    #[error("expected a pattern literal such as `/abc/i`")]
    InvalidLiteral,

    /// Groups nested deeper than the configured limit.
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,
}

/// A parse failure and the source span it points at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {}..{}", .span.start, .span.end)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Printer rendering this error as an annotated snippet of `source`.
    pub fn printer<'e, 's>(&'e self, source: &'s str) -> ErrorPrinter<'e, 's> {
        ErrorPrinter::new(self, source)
    }
}

/// Builder-style printer for a [`ParseError`].
pub struct ErrorPrinter<'e, 's> {
    error: &'e ParseError,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'e, 's> ErrorPrinter<'e, 's> {
    pub fn new(error: &'e ParseError, source: &'s str) -> Self {
        Self {
            error,
            source,
            path: None,
            colored: false,
        }
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        let message = self.error.kind.to_string();
        let range = adjust_range(self.error.span, self.source.len());

        let mut snippet = Snippet::source(self.source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(&message));
        if let Some(path) = self.path {
            snippet = snippet.path(path);
        }

        let report = vec![Level::ERROR.primary_title(&message).element(snippet)];
        write!(w, "{}", renderer.render(&report))
    }
}

/// Widens empty spans to one character so the caret stays visible.
fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    if span.is_empty() {
        let start = span.start.min(limit);
        return start..(start + 1).min(limit);
    }
    span.start.min(limit)..span.end.min(limit)
}
