//! The dumper: a shared-structure-aware printer used for both `Show`
//! and the `printf`-style `%O`/`%#O` formatting directives.
//!
//! Values that appear more than once in the structure being printed
//! (by cell identity, not by `=`) are rendered with `#N=`/`#N#` labels
//! the second and later times they are visited, the way a reader
//! macro would need to reconstruct shared references.

use std::collections::HashMap;
use std::fmt::Write as _;

use wisp_core::value::Tag;
use wisp_core::{CellRef, Heap, Identifier, Value, Variant};

use crate::string;

pub struct Dumper<'a> {
    heap: &'a Heap,
    readably: bool,
    seen_count: HashMap<CellRef, usize>,
    labeled: HashMap<CellRef, usize>,
    next_label: usize,
}

impl<'a> Dumper<'a> {
    pub fn new(heap: &'a Heap, readably: bool) -> Self {
        Dumper { heap, readably, seen_count: HashMap::new(), labeled: HashMap::new(), next_label: 1 }
    }

    /// Two-pass entry point: count references first so shared cells
    /// get a label assigned before the first occurrence is printed.
    pub fn dump(mut self, value: Value) -> String {
        self.count(value);
        let mut out = String::new();
        self.write(&mut out, value);
        out
    }

    fn count(&mut self, value: Value) {
        let cref = value.cell_ref();
        let count = self.seen_count.entry(cref).or_insert(0);
        *count += 1;
        if *count > 1 {
            return; // already descended into this subtree once
        }
        match self.heap.variant(value) {
            Variant::List(Some(car)) => {
                self.count(*car);
                if let Some(next) = self.heap.next_of(value) {
                    self.count(Value(next));
                }
            }
            Variant::Block(body) => self.count(*body),
            Variant::Closure(c) => {
                self.count(c.body);
                self.count(c.scope);
            }
            Variant::BoxCell(v) => self.count(*v),
            _ => {}
        }
    }

    fn write(&mut self, out: &mut String, value: Value) {
        let cref = value.cell_ref();
        let seen_more_than_once = self.seen_count.get(&cref).copied().unwrap_or(0) > 1;
        if seen_more_than_once {
            if let Some(label) = self.labeled.get(&cref) {
                write!(out, "#{label}#").unwrap();
                return;
            }
            let label = self.next_label;
            self.next_label += 1;
            self.labeled.insert(cref, label);
            write!(out, "#{label}=").unwrap();
        }
        self.write_body(out, value);
    }

    fn write_body(&mut self, out: &mut String, value: Value) {
        match self.heap.variant(value) {
            Variant::Integer(n) => write!(out, "{n}").unwrap(),
            Variant::Float(f) => write!(out, "{f}").unwrap(),
            Variant::Bool(b) => write!(out, "{}", if *b { "True" } else { "False" }).unwrap(),
            Variant::Eof => out.push_str("#<EOF>"),
            Variant::StringChunk { .. } => {
                let text = string::to_string_lossy(self.heap, value);
                if self.readably {
                    out.push('"');
                    for ch in text.chars() {
                        match ch {
                            '"' => out.push_str("\\\""),
                            '\\' => out.push_str("\\\\"),
                            _ => out.push(ch),
                        }
                    }
                    out.push('"');
                } else {
                    out.push_str(&text);
                }
            }
            Variant::Identifier(id) | Variant::Symbol(id) => {
                let id = *id;
                let leading = if self.heap.tag_of(value) == Tag::Symbol { "\\" } else { "" };
                out.push_str(leading);
                match id {
                    Identifier::Long(head) => out.push_str(&string::to_string_lossy(self.heap, Value(head))),
                    other => out.push_str(&render_identifier(other)),
                }
            }
            Variant::List(car) => {
                let car = *car;
                out.push('(');
                self.write_list_tail(out, car, self.heap.next_of(value));
                out.push(')');
            }
            Variant::Block(body) => {
                // A block's concrete syntax is a parenthesized group,
                // and its body is already an ordinary command list, so
                // this renders identically to a quoted list.
                self.write(out, *body);
            }
            Variant::Closure(_) => {
                write!(out, "#<Closure: {:p} {:?}>", value.cell_ref(), self.heap.next_of(value))
                    .unwrap();
            }
            Variant::BuiltinFunc(slot) => write!(out, "#<Builtin: {slot}>").unwrap(),
            Variant::BoxCell(inner) => {
                let inner = *inner;
                out.push_str("#<Var: ");
                self.write(out, inner);
                out.push('>');
            }
            Variant::IoString(_) => {
                write!(out, "#<IoString: {:p}>", value.cell_ref()).unwrap();
            }
            Variant::Foreign(fd) => write!(out, "#<{}: {:p}>", fd.type_name, value.cell_ref()).unwrap(),
            Variant::Free => out.push_str("#<Free>"),
        }
    }

    fn write_list_tail(&mut self, out: &mut String, car: Option<Value>, next: Option<CellRef>) {
        let Some(car) = car else { return };
        self.write(out, car);
        match next {
            None => {}
            Some(next_ref) => {
                let next_val = Value(next_ref);
                if self.heap.tag_of(next_val) == Tag::List {
                    let (next_car, next_next) =
                        match self.heap.variant(next_val) {
                            Variant::List(c) => (*c, self.heap.next_of(next_val)),
                            _ => unreachable!(),
                        };
                    if next_car.is_some() {
                        out.push(' ');
                    }
                    self.write_list_tail(out, next_car, next_next);
                } else {
                    out.push_str(" . ");
                    self.write(out, next_val);
                }
            }
        }
    }
}

pub fn render_identifier(id: Identifier) -> String {
    match id {
        Identifier::Packed(p) => Identifier::explode_packed(p),
        Identifier::Builtin(slot) => format!("#<builtin:{slot}>"),
        Identifier::Long(cref) => {
            // Rendering a long identifier's text requires the heap,
            // which `render_identifier` does not have; callers holding
            // a `Long` identifier should use `Dumper` directly instead.
            let _ = cref;
            String::from("#<long-identifier>")
        }
    }
}

/// `Show`: the non-readable, human-facing rendering.
pub fn show(heap: &Heap, value: Value) -> String {
    Dumper::new(heap, false).dump(value)
}

/// `%#O`-style readable rendering: output that, fed back through the
/// parser, reproduces the value structurally for the subset of types
/// the testable properties cover.
pub fn show_readably(heap: &Heap, value: Value) -> String {
    Dumper::new(heap, true).dump(value)
}

/// Minimal `printf`-style formatter supporting `%O` (show) and `%#O`
/// (show readably); any other `%`-directive is passed through
/// literally rather than guessing at a conversion.
pub fn format(heap: &Heap, fmt: &str, args: &[Value]) -> String {
    let mut out = String::new();
    let mut chars = fmt.chars().peekable();
    let mut arg_iter = args.iter();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('#') => {
                chars.next();
                if chars.peek() == Some(&'O') {
                    chars.next();
                    if let Some(v) = arg_iter.next() {
                        out.push_str(&show_readably(heap, *v));
                    }
                } else {
                    out.push_str("%#");
                }
            }
            Some('O') => {
                chars.next();
                if let Some(v) = arg_iter.next() {
                    out.push_str(&show(heap, *v));
                }
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_core::list;

    #[test]
    fn shows_scalars() {
        let mut heap = Heap::new();
        let n = heap.alloc(Variant::Integer(3));
        assert_eq!(show(&heap, n), "3");
        let b = heap.alloc(Variant::Bool(false));
        assert_eq!(show(&heap, b), "False");
    }

    #[test]
    fn shows_list_literal() {
        let mut heap = Heap::new();
        let one = heap.alloc(Variant::Integer(1));
        let two = heap.alloc(Variant::Integer(2));
        let three = heap.alloc(Variant::Integer(3));
        let l = list::from_iter(&mut heap, vec![one, two, three].into_iter());
        assert_eq!(show(&heap, l), "(1 2 3)");
    }

    #[test]
    fn shows_symbol_with_backslash() {
        let mut heap = Heap::new();
        let id = wisp_core::Identifier::try_pack("foo").unwrap();
        let v = heap.alloc(Variant::Symbol(id));
        assert_eq!(show(&heap, v), "\\Foo");
    }

    #[test]
    fn quotes_strings_when_readable() {
        let mut heap = Heap::new();
        let s = string::make_string(&mut heap, "a\"b");
        assert_eq!(show(&heap, s), "a\"b");
        assert_eq!(show_readably(&heap, s), "\"a\\\"b\"");
    }
}
