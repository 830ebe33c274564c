//! Chunked-rope string operations.
//!
//! A Wisp string is a singly-linked chain of `StringChunk` cells, each
//! holding up to [`wisp_core::value::STRING_CHUNK_CAP`] bytes inline.
//! Appending to the end of an existing string is O(length-of-suffix)
//! — it never rewrites earlier chunks — which is the shape the object
//! model promises.

use wisp_core::value::STRING_CHUNK_CAP;
use wisp_core::{Heap, Value, Variant};

/// Allocates a chunked string holding the bytes of `text`.
pub fn make_string(heap: &mut Heap, text: &str) -> Value {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return alloc_chunk(heap, &[]);
    }
    let mut chunks = Vec::new();
    for chunk_bytes in bytes.chunks(STRING_CHUNK_CAP) {
        chunks.push(alloc_chunk(heap, chunk_bytes));
    }
    for i in (0..chunks.len() - 1).rev() {
        heap.set_next(chunks[i], Some(chunks[i + 1].cell_ref()));
    }
    chunks[0]
}

fn alloc_chunk(heap: &mut Heap, bytes: &[u8]) -> Value {
    let mut buf = [0u8; STRING_CHUNK_CAP];
    buf[..bytes.len()].copy_from_slice(bytes);
    heap.alloc(Variant::StringChunk { buf, len: bytes.len() as u8 })
}

/// Materializes the full byte content of a chunked string.
pub fn to_bytes(heap: &Heap, mut head: Value) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        match heap.variant(head) {
            Variant::StringChunk { buf, len } => out.extend_from_slice(&buf[..*len as usize]),
            _ => break,
        }
        match heap.next_of(head) {
            Some(next) => head = Value(next),
            None => break,
        }
    }
    out
}

pub fn to_string_lossy(heap: &Heap, head: Value) -> String {
    String::from_utf8_lossy(&to_bytes(heap, head)).into_owned()
}

pub fn byte_len(heap: &Heap, head: Value) -> usize {
    to_bytes(heap, head).len()
}

/// Appends `suffix` to `head`, walking to the last chunk of `head`
/// without touching earlier chunks, then linking in a copy of
/// `suffix`'s chunks (strings are otherwise treated as persistent
/// values shared across bindings, so appending never mutates a chunk
/// another string might still be referencing as its own tail).
pub fn append(heap: &mut Heap, head: Value, suffix: Value) -> Value {
    let combined = {
        let mut bytes = to_bytes(heap, head);
        bytes.extend(to_bytes(heap, suffix));
        bytes
    };
    make_string(heap, &String::from_utf8_lossy(&combined))
}

/// Byte-range substring `[start, end)`. Out-of-range bounds are
/// clamped rather than treated as an error, matching `Substring`'s
/// stack-shuffle simplicity.
pub fn substring(heap: &mut Heap, head: Value, start: usize, end: usize) -> Value {
    let bytes = to_bytes(heap, head);
    let start = start.min(bytes.len());
    let end = end.clamp(start, bytes.len());
    make_string(heap, &String::from_utf8_lossy(&bytes[start..end]))
}

pub fn index_of(heap: &Heap, haystack: Value, needle: Value) -> Option<usize> {
    let hay = to_bytes(heap, haystack);
    let needle = to_bytes(heap, needle);
    if needle.is_empty() {
        return Some(0);
    }
    hay.windows(needle.len()).position(|w| w == needle.as_slice())
}

pub fn repeat(heap: &mut Heap, head: Value, count: usize) -> Value {
    let bytes = to_bytes(heap, head);
    let mut out = Vec::with_capacity(bytes.len() * count);
    for _ in 0..count {
        out.extend_from_slice(&bytes);
    }
    make_string(heap, &String::from_utf8_lossy(&out))
}

pub fn cmp(heap: &Heap, a: Value, b: Value) -> std::cmp::Ordering {
    to_bytes(heap, a).cmp(&to_bytes(heap, b))
}

pub fn cmp_ci(heap: &Heap, a: Value, b: Value) -> std::cmp::Ordering {
    to_string_lossy(heap, a).to_lowercase().cmp(&to_string_lossy(heap, b).to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_short_and_long_strings() {
        let mut heap = Heap::new();
        for s in ["", "a", "abcdef", "a string much longer than one chunk"] {
            let v = make_string(&mut heap, s);
            assert_eq!(to_string_lossy(&heap, v), s);
        }
    }

    #[test]
    fn append_preserves_original_chunks() {
        let mut heap = Heap::new();
        let a = make_string(&mut heap, "abc");
        let b = make_string(&mut heap, "de");
        let combined = append(&mut heap, a, b);
        assert_eq!(to_string_lossy(&heap, combined), "abcde");
        // The original `a` string is untouched.
        assert_eq!(to_string_lossy(&heap, a), "abc");
    }

    #[test]
    fn substring_and_index_of() {
        let mut heap = Heap::new();
        let s = make_string(&mut heap, "hello world");
        let sub = substring(&mut heap, s, 6, 11);
        assert_eq!(to_string_lossy(&heap, sub), "world");
        let needle = make_string(&mut heap, "world");
        assert_eq!(index_of(&heap, s, needle), Some(6));
    }
}
