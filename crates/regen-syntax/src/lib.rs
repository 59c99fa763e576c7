//! Syntax tree provider for regen.
//!
//! Parses a pattern plus its [`Flags`] into a [`Pattern`]: an immutable tree
//! of [`Node`]s that the generation engine compiles. The tree keeps every
//! construct of the dialect, including the ones the engine does not
//! generate for (lookaround, named groups, property escapes), so that the
//! engine can decide how to degrade them.
//!
//! # Example
//!
//! ```
//! use regen_syntax::{Flags, NodeKind, parse};
//!
//! let pattern = parse("(ab)+\\1", Flags::default()).unwrap();
//! assert_eq!(pattern.group_count, 1);
//! assert!(matches!(pattern.root.kind, NodeKind::Disjunction(_)));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod ast;
pub mod classes;
pub mod error;
pub mod flags;
pub mod parser;

mod dump;


pub use ast::{Bound, Node, NodeKind, Pattern, Quantifier, SetItem, Span};
pub use error::{ErrorPrinter, ParseError, ParseErrorKind};
pub use flags::Flags;
pub use parser::{DEFAULT_RECURSION_LIMIT, Parser};

/// Parse `pattern` with the default recursion limit.
pub fn parse(pattern: &str, flags: Flags) -> Result<Pattern, ParseError> {
    Parser::new(pattern, flags).parse()
}

/// Parse a pattern literal of the form `/body/flags`.
///
/// Error spans point into `literal`, not into the body alone.
pub fn parse_literal(literal: &str) -> Result<Pattern, ParseError> {
    parse_literal_with_limit(literal, DEFAULT_RECURSION_LIMIT)
}

/// [`parse_literal`] with an explicit group nesting limit.
pub fn parse_literal_with_limit(
    literal: &str,
    recursion_limit: u32,
) -> Result<Pattern, ParseError> {
    let (body, flags, flags_offset) = split_literal(literal)?;
    let flags = Flags::parse(flags).map_err(|err| shift(err, flags_offset))?;
    Parser::new(body, flags)
        .with_recursion_limit(recursion_limit)
        .parse()
        .map_err(|err| shift(err, 1))
}

fn split_literal(literal: &str) -> Result<(&str, &str, usize), ParseError> {
    let invalid = || {
        ParseError::new(
            ParseErrorKind::InvalidLiteral,
            Span::new(0, literal.len()),
        )
    };
    let rest = literal.strip_prefix('/').ok_or_else(invalid)?;
    let close = rest.rfind('/').ok_or_else(invalid)?;
    Ok((&rest[..close], &rest[close + 1..], close + 2))
}

fn shift(mut err: ParseError, offset: usize) -> ParseError {
    err.span = Span::new(err.span.start + offset, err.span.end + offset);
    err
}
