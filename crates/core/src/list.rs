//! Cons-list helpers built on top of the raw `List` variant.
//!
//! Every structured thing in the engine that is not a scalar — blocks,
//! environments, the work stack snapshot a continuation captures — is
//! ultimately one of these lists, so the helpers live in `wisp-core`
//! rather than being duplicated per consumer.

use crate::heap::Heap;
use crate::value::{Value, Variant};

/// Allocates the canonical empty list: a `List` cell with no car and
/// no next.
pub fn nil(heap: &mut Heap) -> Value {
    heap.alloc(Variant::List(None))
}

pub fn is_nil(heap: &Heap, v: Value) -> bool {
    matches!(heap.variant(v), Variant::List(None)) && heap.next_of(v).is_none()
}

/// Prepends `car` onto `tail`, returning the new head cell.
pub fn cons(heap: &mut Heap, car: Value, tail: Value) -> Value {
    let cell = heap.alloc(Variant::List(Some(car)));
    heap.set_next(cell, Some(tail.cell_ref()));
    cell
}

pub fn car(heap: &Heap, v: Value) -> Option<Value> {
    match heap.variant(v) {
        Variant::List(car) => *car,
        _ => None,
    }
}

pub fn cdr(heap: &Heap, v: Value) -> Option<Value> {
    heap.next_of(v).map(Value)
}

/// Builds a list from `items`, in order, terminated by `nil`.
pub fn from_iter(heap: &mut Heap, items: impl DoubleEndedIterator<Item = Value>) -> Value {
    let mut tail = nil(heap);
    for item in items.rev() {
        tail = cons(heap, item, tail);
    }
    tail
}

/// Collects a list into a `Vec`, stopping at the first non-`List`
/// tail (an improper/dotted list) or at `nil`.
pub fn to_vec(heap: &Heap, mut v: Value) -> Vec<Value> {
    let mut out = Vec::new();
    loop {
        match heap.variant(v) {
            Variant::List(Some(car)) => {
                out.push(*car);
                match cdr(heap, v) {
                    Some(next) if heap.tag_of(next) == crate::value::Tag::List => v = next,
                    _ => break,
                }
            }
            _ => break,
        }
    }
    out
}

pub fn len(heap: &Heap, v: Value) -> usize {
    to_vec(heap, v).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cons_and_to_vec_round_trip() {
        let mut heap = Heap::new();
        let a = heap.alloc(Variant::Integer(1));
        let b = heap.alloc(Variant::Integer(2));
        let list = from_iter(&mut heap, vec![a, b].into_iter());
        let items = to_vec(&heap, list);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn nil_is_empty() {
        let mut heap = Heap::new();
        let n = nil(&mut heap);
        assert!(is_nil(&heap, n));
        assert_eq!(to_vec(&heap, n).len(), 0);
    }
}
