//! Indented text dump of a syntax tree, one node per line.

use std::fmt::Write;

use crate::ast::{Node, NodeKind, SetItem};

impl Node {
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.write_dump(&mut out, 0)
            .expect("String write never fails");
        out.truncate(out.trim_end().len());
        out
    }

    fn write_dump(&self, w: &mut impl Write, depth: usize) -> std::fmt::Result {
        write!(w, "{:indent$}", "", indent = depth * 2)?;
        self.write_label(w)?;
        if let Some(quantifier) = &self.quantifier {
            write!(w, " {quantifier}")?;
        }
        writeln!(w)?;
        for child in self.children() {
            child.write_dump(w, depth + 1)?;
        }
        Ok(())
    }

    fn write_label(&self, w: &mut impl Write) -> std::fmt::Result {
        let name = self.kind.name();
        match &self.kind {
            NodeKind::Character(c) => write!(w, "{name} {c:?}"),
            NodeKind::Set { items, complement } => {
                write!(w, "{name} [")?;
                if *complement {
                    w.write_char('^')?;
                }
                for item in items {
                    match item {
                        SetItem::Char(c) => write!(w, "{}", c.escape_debug())?,
                        SetItem::Range { from, to } => {
                            write!(w, "{}-{}", from.escape_debug(), to.escape_debug())?
                        }
                    }
                }
                w.write_char(']')
            }
            NodeKind::Group {
                index: Some(index), ..
            } => write!(w, "{name} #{index}"),
            NodeKind::Group { index: None, .. } => write!(w, "{name} non-capturing"),
            NodeKind::GroupBackReference(index) => write!(w, "{name} #{index}"),
            NodeKind::NamedGroup {
                name: group, index, ..
            } => write!(w, "{name} <{group}> #{index}"),
            NodeKind::NamedBackReference(group) => write!(w, "{name} <{group}>"),
            NodeKind::UnicodeProperty {
                name: property,
                negated,
            } => {
                let letter = if *negated { 'P' } else { 'p' };
                write!(w, "{name} \\{letter}{{{property}}}")
            }
            _ => w.write_str(name),
        }
    }
}
