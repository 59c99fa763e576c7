//! Recursive-descent parser for the pattern dialect.
//!
//! The dialect is ECMAScript-flavoured, including its web-compatibility
//! leniencies: a `{` that does not start a quantifier is a literal, `]` and
//! `}` are literals outside classes, and a numeric escape larger than the
//! number of capturing groups is a legacy octal escape (or the digit itself).
//!
//! Every capturing group is counted before parsing so that `\N` can be told
//! apart from an octal escape even when the group appears later.

use crate::ast::{Bound, Node, NodeKind, Pattern, Quantifier, SetItem, Span};
use crate::classes;
use crate::error::{ParseError, ParseErrorKind};
use crate::flags::Flags;

/// Maximum group nesting accepted by default.
pub const DEFAULT_RECURSION_LIMIT: u32 = 256;

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'src> {
    source: &'src str,
    chars: Vec<(usize, char)>,
    pos: usize,
    flags: Flags,
    /// Capturing groups opened so far; the next one gets `group_count + 1`.
    group_count: u32,
    /// Capturing groups in the whole pattern.
    total_groups: u32,
    depth: u32,
    recursion_limit: u32,
}

/// Result of parsing one class atom.
enum ClassAtom {
    Char(char),
    Class(Vec<SetItem>),
}

impl ClassAtom {
    fn push_into(self, items: &mut Vec<SetItem>) {
        match self {
            Self::Char(c) => items.push(SetItem::Char(c)),
            Self::Class(class) => items.extend(class),
        }
    }
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, flags: Flags) -> Self {
        let chars: Vec<(usize, char)> = source.char_indices().collect();
        let total_groups = count_capturing_groups(&chars);
        Self {
            source,
            chars,
            pos: 0,
            flags,
            group_count: 0,
            total_groups,
            depth: 0,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }

    pub fn with_recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn parse(mut self) -> ParseResult<Pattern> {
        let root = self.parse_disjunction()?;
        if !self.eof() {
            // The only character that stops a top-level disjunction early.
            let start = self.offset();
            return Err(self.error(ParseErrorKind::UnmatchedParen, start));
        }
        Ok(Pattern {
            root,
            flags: self.flags,
            group_count: self.group_count,
            source: self.source.to_string(),
        })
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, c)| c)
    }

    fn peek(&self) -> Option<char> {
        self.char_at(self.pos)
    }

    fn peek_at(&self, lookahead: usize) -> Option<char> {
        self.char_at(self.pos + lookahead)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Byte offset of the cursor.
    fn offset(&self) -> usize {
        self.offset_of(self.pos)
    }

    fn offset_of(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map_or(self.source.len(), |&(offset, _)| offset)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.offset())
    }

    /// Error covering the single character at byte offset `start`.
    fn error(&self, kind: ParseErrorKind, start: usize) -> ParseError {
        let len = self.source[start..].chars().next().map_or(0, char::len_utf8);
        ParseError::new(kind, Span::new(start, start + len))
    }

    fn enter(&mut self, start: usize) -> ParseResult<()> {
        self.depth += 1;
        if self.depth > self.recursion_limit {
            return Err(self.error(ParseErrorKind::RecursionLimitExceeded, start));
        }
        Ok(())
    }

    fn exit(&mut self) {
        self.depth -= 1;
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    fn parse_disjunction(&mut self) -> ParseResult<Node> {
        let start = self.offset();
        let mut alternatives = vec![self.parse_alternative()?];
        while self.eat('|') {
            alternatives.push(self.parse_alternative()?);
        }
        Ok(Node::new(
            NodeKind::Disjunction(alternatives),
            self.span_from(start),
        ))
    }

    fn parse_alternative(&mut self) -> ParseResult<Node> {
        let start = self.offset();
        let mut terms = Vec::new();
        while let Some(c) = self.peek() {
            if c == '|' || c == ')' {
                break;
            }
            terms.push(self.parse_term()?);
        }
        Ok(Node::new(NodeKind::Alternative(terms), self.span_from(start)))
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        let start = self.offset();
        let assertion = match (self.peek(), self.peek_at(1)) {
            (Some('^'), _) => Some((NodeKind::StartAnchor, 1)),
            (Some('$'), _) => Some((NodeKind::EndAnchor, 1)),
            (Some('\\'), Some('b')) => Some((NodeKind::WordBoundary, 2)),
            (Some('\\'), Some('B')) => Some((NodeKind::NonWordBoundary, 2)),
            _ => None,
        };

        if let Some((kind, len)) = assertion {
            self.pos += len;
            let node = Node::new(kind, self.span_from(start));
            if self.scan_quantifier().is_some() {
                let at = self.offset();
                return Err(self.error(ParseErrorKind::NothingToRepeat, at));
            }
            return Ok(node);
        }

        let atom = self.parse_atom()?;
        self.parse_quantifier(atom)
    }

    fn parse_quantifier(&mut self, node: Node) -> ParseResult<Node> {
        let start = self.offset();
        let Some((mut quantifier, len)) = self.scan_quantifier() else {
            return Ok(node);
        };
        self.pos += len;

        if let Bound::Finite(at_most) = quantifier.at_most
            && at_most < quantifier.at_least
        {
            return Err(ParseError::new(
                ParseErrorKind::QuantifierOutOfOrder,
                self.span_from(start),
            ));
        }
        if self.eat('?') {
            quantifier = quantifier.lazy();
        }

        let span = Span::new(node.span.start, self.offset());
        let mut node = node.with_quantifier(quantifier);
        node.span = span;
        Ok(node)
    }

    /// Quantifier at the cursor and its length in characters, without
    /// consuming anything.
    fn scan_quantifier(&self) -> Option<(Quantifier, usize)> {
        match self.peek()? {
            '*' => Some((Quantifier::zero_or_more(), 1)),
            '+' => Some((Quantifier::one_or_more(), 1)),
            '?' => Some((Quantifier::optional(), 1)),
            '{' => self.scan_braces(),
            _ => None,
        }
    }

    /// `{n}`, `{n,}` or `{n,m}` at the cursor.
    fn scan_braces(&self) -> Option<(Quantifier, usize)> {
        let mut i = self.pos + 1;
        let (at_least, len) = self.scan_number(i)?;
        i += len;

        let at_most = if self.char_at(i) == Some(',') {
            i += 1;
            match self.scan_number(i) {
                Some((at_most, len)) => {
                    i += len;
                    Bound::Finite(at_most)
                }
                None => Bound::Unbounded,
            }
        } else {
            Bound::Finite(at_least)
        };

        (self.char_at(i) == Some('}'))
            .then(|| (Quantifier::new(at_least, at_most), i + 1 - self.pos))
    }

    /// Decimal digits starting at char index `from`. Saturates on overflow.
    fn scan_number(&self, from: usize) -> Option<(u32, usize)> {
        let mut value = 0u32;
        let mut len = 0;
        while let Some(digit) = self.char_at(from + len).and_then(|c| c.to_digit(10)) {
            value = value.saturating_mul(10).saturating_add(digit);
            len += 1;
        }
        (len > 0).then_some((value, len))
    }

    fn scan_hex(&self, from: usize, len: usize) -> Option<u32> {
        let mut value = 0u32;
        for i in from..from + len {
            value = value * 16 + self.char_at(i)?.to_digit(16)?;
        }
        Some(value)
    }

    // ------------------------------------------------------------------
    // Atoms
    // ------------------------------------------------------------------

    fn parse_atom(&mut self) -> ParseResult<Node> {
        let start = self.offset();
        let Some(c) = self.peek() else {
            return Err(ParseError::new(
                ParseErrorKind::NothingToRepeat,
                Span::new(start, start),
            ));
        };

        match c {
            '*' | '+' | '?' => return Err(self.error(ParseErrorKind::NothingToRepeat, start)),
            '{' => {
                if let Some((_, len)) = self.scan_braces() {
                    let end = self.offset_of(self.pos + len);
                    return Err(ParseError::new(
                        ParseErrorKind::NothingToRepeat,
                        Span::new(start, end),
                    ));
                }
            }
            _ => {}
        }

        self.pos += 1;
        let kind = match c {
            '.' => {
                let items = if self.flags.dot_all {
                    Vec::new()
                } else {
                    classes::line_terminators()
                };
                NodeKind::Set {
                    items,
                    complement: true,
                }
            }
            '(' => return self.parse_group(start),
            '[' => return self.parse_class(start),
            '\\' => self.parse_atom_escape(start)?,
            ')' => return Err(self.error(ParseErrorKind::UnmatchedParen, start)),
            c => NodeKind::Character(c),
        };
        Ok(Node::new(kind, self.span_from(start)))
    }

    /// Group of any flavour. The opening `(` is already consumed.
    fn parse_group(&mut self, start: usize) -> ParseResult<Node> {
        self.enter(start)?;

        let kind = if self.eat('?') {
            match self.bump() {
                Some(':') => {
                    let child = self.parse_group_body(start)?;
                    NodeKind::Group {
                        child,
                        capturing: false,
                        index: None,
                    }
                }
                Some('=') => NodeKind::Lookahead(self.parse_group_body(start)?),
                Some('!') => NodeKind::NegativeLookahead(self.parse_group_body(start)?),
                Some('<') if self.eat('=') => NodeKind::Lookbehind(self.parse_group_body(start)?),
                Some('<') if self.eat('!') => {
                    NodeKind::NegativeLookbehind(self.parse_group_body(start)?)
                }
                Some('<') => {
                    let name = self.parse_group_name()?;
                    self.group_count += 1;
                    let index = self.group_count;
                    let child = self.parse_group_body(start)?;
                    NodeKind::NamedGroup { name, index, child }
                }
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidGroup,
                        self.span_from(start),
                    ));
                }
            }
        } else {
            self.group_count += 1;
            let index = self.group_count;
            let child = self.parse_group_body(start)?;
            NodeKind::Group {
                child,
                capturing: true,
                index: Some(index),
            }
        };

        self.exit();
        Ok(Node::new(kind, self.span_from(start)))
    }

    fn parse_group_body(&mut self, start: usize) -> ParseResult<Box<Node>> {
        let child = self.parse_disjunction()?;
        if !self.eat(')') {
            return Err(self.error(ParseErrorKind::UnclosedGroup, start));
        }
        Ok(Box::new(child))
    }

    /// `name>` of `(?<name>` and `\k<name>`; the `<` is already consumed.
    fn parse_group_name(&mut self) -> ParseResult<String> {
        let start = self.offset();
        let mut name = String::new();
        loop {
            match self.bump() {
                Some('>') if !name.is_empty() => return Ok(name),
                Some(c) if is_name_char(c, name.is_empty()) => name.push(c),
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidGroupName,
                        self.span_from(start),
                    ));
                }
            }
        }
    }

    /// Escape outside a class. The `\` is already consumed.
    fn parse_atom_escape(&mut self, start: usize) -> ParseResult<NodeKind> {
        let Some(c) = self.peek() else {
            return Err(self.error(ParseErrorKind::TrailingBackslash, start));
        };

        if let Some(items) = class_escape(c) {
            self.pos += 1;
            return Ok(NodeKind::Set {
                items,
                complement: c.is_ascii_uppercase(),
            });
        }

        match c {
            '1'..='9' => return Ok(self.parse_decimal_escape()),
            'k' if self.peek_at(1) == Some('<') => {
                self.pos += 2;
                return Ok(NodeKind::NamedBackReference(self.parse_group_name()?));
            }
            'p' | 'P' if self.flags.unicode_mode() && self.peek_at(1) == Some('{') => {
                if let Some(kind) = self.parse_unicode_property() {
                    return Ok(kind);
                }
            }
            _ => {}
        }

        Ok(NodeKind::Character(self.parse_char_escape(start)?))
    }

    /// `\N`: a backreference when the pattern has at least `N` groups.
    fn parse_decimal_escape(&mut self) -> NodeKind {
        if let Some((value, len)) = self.scan_number(self.pos)
            && value <= self.total_groups
        {
            self.pos += len;
            return NodeKind::GroupBackReference(value);
        }
        NodeKind::Character(self.parse_legacy_digit())
    }

    /// `\8` and `\9` stand for themselves; other digits start an octal escape.
    fn parse_legacy_digit(&mut self) -> char {
        match self.bump() {
            Some(digit @ ('8' | '9')) => digit,
            Some(digit) => self.parse_octal(digit.to_digit(8).unwrap_or(0)),
            None => '\\',
        }
    }

    /// Up to three octal digits with a value of at most `0o377`.
    fn parse_octal(&mut self, first: u32) -> char {
        let mut value = first;
        for _ in 0..2 {
            match self.peek().and_then(|c| c.to_digit(8)) {
                Some(digit) if value * 8 + digit <= 0o377 => {
                    value = value * 8 + digit;
                    self.pos += 1;
                }
                _ => break,
            }
        }
        char::from_u32(value).unwrap_or('\0')
    }

    /// `\p{Name}` / `\P{Name}` with the cursor on the `p`. Returns `None`,
    /// consuming nothing, when the braces are not closed.
    fn parse_unicode_property(&mut self) -> Option<NodeKind> {
        let negated = self.peek() == Some('P');
        let close = (self.pos + 2..self.chars.len()).find(|&i| self.char_at(i) == Some('}'))?;
        let name: String = (self.pos + 2..close).filter_map(|i| self.char_at(i)).collect();
        self.pos = close + 1;
        Some(NodeKind::UnicodeProperty { name, negated })
    }

    /// Escape that stands for a single character, with the cursor on the
    /// character after `\`.
    fn parse_char_escape(&mut self, start: usize) -> ParseResult<char> {
        let Some(c) = self.bump() else {
            return Err(self.error(ParseErrorKind::TrailingBackslash, start));
        };

        let escaped = match c {
            't' => '\t',
            'n' => '\n',
            'v' => '\u{b}',
            'f' => '\u{c}',
            'r' => '\r',
            'c' => match self.peek() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.pos += 1;
                    char::from(letter as u8 % 32)
                }
                // `\c` without a control letter is a literal backslash.
                _ => {
                    self.pos -= 1;
                    '\\'
                }
            },
            '0' => self.parse_octal(0),
            'x' => match self.scan_hex(self.pos, 2) {
                Some(value) => {
                    self.pos += 2;
                    char::from_u32(value).unwrap_or('x')
                }
                None => 'x',
            },
            'u' => self.parse_unicode_escape(start)?,
            other => other,
        };
        Ok(escaped)
    }

    /// `\uHHHH` (surrogate pairs combined) and, under `u`, `\u{H...}`.
    /// The `u` is already consumed.
    fn parse_unicode_escape(&mut self, start: usize) -> ParseResult<char> {
        if self.flags.unicode_mode() && self.peek() == Some('{') {
            let digits_start = self.pos + 1;
            let digits = (digits_start..self.chars.len())
                .take_while(|&i| self.char_at(i).is_some_and(|c| c.is_ascii_hexdigit()))
                .count();
            let close = digits_start + digits;
            if digits == 0 || self.char_at(close) != Some('}') {
                return Err(ParseError::new(
                    ParseErrorKind::InvalidCodePoint,
                    self.span_from(start),
                ));
            }
            self.pos = close + 1;

            let value = (digits_start..close)
                .filter_map(|i| self.char_at(i)?.to_digit(16))
                .try_fold(0u32, |acc, digit| {
                    acc.checked_mul(16)?.checked_add(digit)
                })
                .filter(|&value| value <= u32::from(char::MAX));
            return match value {
                None => Err(ParseError::new(
                    ParseErrorKind::InvalidCodePoint,
                    self.span_from(start),
                )),
                Some(value) => char::from_u32(value).ok_or_else(|| {
                    ParseError::new(ParseErrorKind::LoneSurrogate(value), self.span_from(start))
                }),
            };
        }

        let Some(high) = self.scan_hex(self.pos, 4) else {
            return Ok('u');
        };
        self.pos += 4;

        let mut code_point = high;
        if (0xD800..=0xDBFF).contains(&high)
            && self.peek() == Some('\\')
            && self.peek_at(1) == Some('u')
            && let Some(low) = self.scan_hex(self.pos + 2, 4)
            && (0xDC00..=0xDFFF).contains(&low)
        {
            self.pos += 6;
            code_point = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        }

        char::from_u32(code_point).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::LoneSurrogate(code_point),
                self.span_from(start),
            )
        })
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// `[...]`. The `[` is already consumed.
    fn parse_class(&mut self, start: usize) -> ParseResult<Node> {
        let complement = self.eat('^');
        let mut items = Vec::new();

        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnclosedClass, start)),
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {}
            }

            let atom_start = self.offset();
            let first = self.parse_class_atom()?;

            let is_range = self.peek() == Some('-')
                && self.peek_at(1).is_some_and(|next| next != ']');
            if !is_range {
                first.push_into(&mut items);
                continue;
            }

            self.pos += 1;
            let second = self.parse_class_atom()?;
            match (first, second) {
                (ClassAtom::Char(from), ClassAtom::Char(to)) => {
                    if from > to {
                        return Err(ParseError::new(
                            ParseErrorKind::RangeOutOfOrder,
                            self.span_from(atom_start),
                        ));
                    }
                    items.push(SetItem::range(from, to));
                }
                // A class escape on either side turns the `-` into a literal.
                (first, second) => {
                    first.push_into(&mut items);
                    items.push(SetItem::Char('-'));
                    second.push_into(&mut items);
                }
            }
        }

        Ok(Node::new(
            NodeKind::Set { items, complement },
            self.span_from(start),
        ))
    }

    fn parse_class_atom(&mut self) -> ParseResult<ClassAtom> {
        let start = self.offset();
        let Some(c) = self.bump() else {
            return Err(self.error(ParseErrorKind::UnclosedClass, start));
        };
        if c != '\\' {
            return Ok(ClassAtom::Char(c));
        }

        let Some(next) = self.peek() else {
            return Err(self.error(ParseErrorKind::TrailingBackslash, start));
        };
        if let Some(items) = class_escape(next) {
            self.pos += 1;
            let items = if next.is_ascii_uppercase() {
                classes::negate(&items)
            } else {
                items
            };
            return Ok(ClassAtom::Class(items));
        }

        let atom = match next {
            'b' => {
                self.pos += 1;
                '\u{8}'
            }
            '-' => {
                self.pos += 1;
                '-'
            }
            '1'..='9' => self.parse_legacy_digit(),
            _ => self.parse_char_escape(start)?,
        };
        Ok(ClassAtom::Char(atom))
    }
}

/// Items behind `\d \D \w \W \s \S`, before negation.
fn class_escape(c: char) -> Option<Vec<SetItem>> {
    match c {
        'd' | 'D' => Some(classes::digit()),
        'w' | 'W' => Some(classes::word()),
        's' | 'S' => Some(classes::space()),
        _ => None,
    }
}

fn is_name_char(c: char, first: bool) -> bool {
    let alnum = if first {
        c.is_alphabetic()
    } else {
        c.is_alphanumeric()
    };
    alnum || c == '_' || c == '$'
}

/// Capturing groups in the pattern: `(` not followed by `?`, plus `(?<name>`.
fn count_capturing_groups(chars: &[(usize, char)]) -> u32 {
    let at = |i: usize| chars.get(i).map(|&(_, c)| c);
    let mut count = 0;
    let mut in_class = false;
    let mut i = 0;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 1,
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => match (at(i + 1), at(i + 2), at(i + 3)) {
                (Some('?'), Some('<'), next) if !matches!(next, Some('=' | '!')) => count += 1,
                (Some('?'), _, _) => {}
                _ => count += 1,
            },
            _ => {}
        }
        i += 1;
    }
    count
}
