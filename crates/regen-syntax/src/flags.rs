//! Pattern flags, written as the usual flag letters (`"gi"`, `"su"`, ...).

use std::fmt;
use std::str::FromStr;

use crate::ast::Span;
use crate::error::{ParseError, ParseErrorKind};

/// Flags that accompany a pattern.
///
/// Only `ignore_case`, `dot_all` and the unicode modes (`u` or `v`)
/// influence parsing or generation. The rest are accepted so that flag strings copied from real
/// patterns round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags {
    /// `d`
    pub has_indices: bool,
    /// `g`
    pub global: bool,
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `s`: `.` also matches line terminators.
    pub dot_all: bool,
    /// `u`: enables `\u{...}` and `\p{...}`.
    pub unicode: bool,
    /// `v`: implies the escapes of `u`.
    pub unicode_sets: bool,
    /// `y`
    pub sticky: bool,
}

const LETTERS: [char; 8] = ['d', 'g', 'i', 'm', 's', 'u', 'v', 'y'];

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_case(mut self, value: bool) -> Self {
        self.ignore_case = value;
        self
    }

    pub fn dot_all(mut self, value: bool) -> Self {
        self.dot_all = value;
        self
    }

    pub fn unicode(mut self, value: bool) -> Self {
        self.unicode = value;
        self
    }

    /// Whether `\u{...}` and `\p{...}` are recognized, under either `u` or `v`.
    pub fn unicode_mode(&self) -> bool {
        self.unicode || self.unicode_sets
    }

    /// Parse a flag string such as `"gi"`.
    ///
    /// Spans in the returned error point into `letters`.
    pub fn parse(letters: &str) -> Result<Self, ParseError> {
        let mut flags = Self::default();
        for (offset, letter) in letters.char_indices() {
            let span = Span::new(offset, offset + letter.len_utf8());
            let Some(slot) = flags.slot_mut(letter) else {
                return Err(ParseError::new(ParseErrorKind::InvalidFlag(letter), span));
            };
            if *slot {
                return Err(ParseError::new(ParseErrorKind::DuplicateFlag(letter), span));
            }
            *slot = true;
        }
        Ok(flags)
    }

    fn slot_mut(&mut self, letter: char) -> Option<&mut bool> {
        let slot = match letter {
            'd' => &mut self.has_indices,
            'g' => &mut self.global,
            'i' => &mut self.ignore_case,
            'm' => &mut self.multiline,
            's' => &mut self.dot_all,
            'u' => &mut self.unicode,
            'v' => &mut self.unicode_sets,
            'y' => &mut self.sticky,
            _ => return None,
        };
        Some(slot)
    }

    fn is_set(&self, letter: char) -> bool {
        match letter {
            'd' => self.has_indices,
            'g' => self.global,
            'i' => self.ignore_case,
            'm' => self.multiline,
            's' => self.dot_all,
            'u' => self.unicode,
            'v' => self.unicode_sets,
            'y' => self.sticky,
            _ => false,
        }
    }
}

impl FromStr for Flags {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in LETTERS {
            if self.is_set(letter) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
