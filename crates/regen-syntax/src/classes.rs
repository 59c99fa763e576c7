//! Predefined character classes (`\d`, `\w`, `\s`, `.`) as set items.

use crate::ast::SetItem;

const SURROGATES: (u32, u32) = (0xD800, 0xDFFF);

/// `\d`
pub fn digit() -> Vec<SetItem> {
    vec![SetItem::range('0', '9')]
}

/// `\w`
pub fn word() -> Vec<SetItem> {
    vec![
        SetItem::range('a', 'z'),
        SetItem::range('A', 'Z'),
        SetItem::range('0', '9'),
        SetItem::Char('_'),
    ]
}

/// `\s`: white space and line terminators.
pub fn space() -> Vec<SetItem> {
    vec![
        SetItem::range('\t', '\r'),
        SetItem::Char(' '),
        SetItem::Char('\u{a0}'),
        SetItem::Char('\u{1680}'),
        SetItem::range('\u{2000}', '\u{200a}'),
        SetItem::range('\u{2028}', '\u{2029}'),
        SetItem::Char('\u{202f}'),
        SetItem::Char('\u{205f}'),
        SetItem::Char('\u{3000}'),
        SetItem::Char('\u{feff}'),
    ]
}

/// Characters `.` refuses to match without the `s` flag.
pub fn line_terminators() -> Vec<SetItem> {
    vec![
        SetItem::Char('\n'),
        SetItem::Char('\r'),
        SetItem::range('\u{2028}', '\u{2029}'),
    ]
}

/// Every scalar value not covered by `items`.
pub fn negate(items: &[SetItem]) -> Vec<SetItem> {
    let mut bounds: Vec<(u32, u32)> = items
        .iter()
        .map(|item| {
            let (from, to) = item.bounds();
            (u32::from(from), u32::from(to))
        })
        .collect();
    bounds.sort_unstable();

    let mut out = Vec::new();
    let mut next = 0u32;
    for (from, to) in bounds {
        if from > next {
            push_gap(&mut out, next, from - 1);
        }
        next = next.max(to.saturating_add(1));
    }
    if next <= u32::from(char::MAX) {
        push_gap(&mut out, next, u32::from(char::MAX));
    }
    out
}

fn push_gap(out: &mut Vec<SetItem>, lo: u32, hi: u32) {
    let (s_lo, s_hi) = SURROGATES;
    let pieces = [(lo, hi.min(s_lo - 1)), (lo.max(s_hi + 1), hi)];
    for (from, to) in pieces {
        if from > to {
            continue;
        }
        if let (Some(from), Some(to)) = (char::from_u32(from), char::from_u32(to)) {
            out.push(SetItem::range(from, to));
        }
    }
}
