//! In-memory bidirectional IO-strings: a chunked string plus a read
//! cursor and an unget buffer, so the same stream methods
//! (`StreamPuts`/`StreamGetch`/`StreamUngets`) that drive real
//! terminals also drive a string being built or consumed in memory.

use wisp_core::{Heap, Value, Variant};

use crate::string;

pub fn make_io_string(heap: &mut Heap, initial: &str) -> Value {
    let contents = string::make_string(heap, initial);
    heap.alloc(Variant::IoString(wisp_core::value::IoStringState {
        contents,
        cursor: 0,
        unget_buffer: Vec::new(),
    }))
}

fn state(heap: &Heap, io: Value) -> &wisp_core::value::IoStringState {
    match heap.variant(io) {
        Variant::IoString(s) => s,
        _ => panic!("not an IoString cell"),
    }
}

fn state_mut(heap: &mut Heap, io: Value) -> &mut wisp_core::value::IoStringState {
    match heap.variant_mut(io) {
        Variant::IoString(s) => s,
        _ => panic!("not an IoString cell"),
    }
}

/// Appends `text` to the end of the stream's backing string. Per the
/// object model's invariant, writes are rejected while the unget
/// buffer is non-empty: draining pending ungets must happen before
/// new output can be interleaved.
pub fn puts(heap: &mut Heap, io: Value, text: &str) -> Result<(), &'static str> {
    if !state(heap, io).unget_buffer.is_empty() {
        return Err("cannot write to an IoString with pending ungets");
    }
    let contents = state(heap, io).contents;
    let addition = string::make_string(heap, text);
    let combined = string::append(heap, contents, addition);
    state_mut(heap, io).contents = combined;
    Ok(())
}

/// Reads one byte, draining the unget buffer first. Returns `None` at
/// end of stream.
pub fn getch(heap: &mut Heap, io: Value) -> Option<u8> {
    if let Some(byte) = state_mut(heap, io).unget_buffer.pop() {
        return Some(byte);
    }
    let contents = state(heap, io).contents;
    let bytes = string::to_bytes(heap, contents);
    let cursor = state(heap, io).cursor;
    if cursor >= bytes.len() {
        return None;
    }
    state_mut(heap, io).cursor += 1;
    Some(bytes[cursor])
}

/// Pushes `bytes` back so the next `getch` calls return them, most
/// recently ungotten first.
pub fn ungets(heap: &mut Heap, io: Value, bytes: &[u8]) {
    state_mut(heap, io).unget_buffer.extend_from_slice(bytes);
}

pub fn contents_string(heap: &Heap, io: Value) -> String {
    string::to_string_lossy(heap, state(heap, io).contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn puts_then_getch_reads_back() {
        let mut heap = Heap::new();
        let io = make_io_string(&mut heap, "");
        puts(&mut heap, io, "hi").unwrap();
        assert_eq!(getch(&mut heap, io), Some(b'h'));
        assert_eq!(getch(&mut heap, io), Some(b'i'));
        assert_eq!(getch(&mut heap, io), None);
    }

    #[test]
    fn unget_is_drained_before_new_reads() {
        let mut heap = Heap::new();
        let io = make_io_string(&mut heap, "x");
        let first = getch(&mut heap, io).unwrap();
        ungets(&mut heap, io, &[first]);
        assert_eq!(getch(&mut heap, io), Some(first));
    }

    #[test]
    fn write_rejected_while_ungets_pending() {
        let mut heap = Heap::new();
        let io = make_io_string(&mut heap, "x");
        let b = getch(&mut heap, io).unwrap();
        ungets(&mut heap, io, &[b]);
        assert!(puts(&mut heap, io, "y").is_err());
    }
}
