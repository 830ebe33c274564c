//! Packed and long identifiers.
//!
//! Short identifiers (<= 11 symbols drawn from [`PACKED_ALPHABET`]) are
//! folded into a single `u64` so comparing and hashing them never
//! touches the heap. Anything else becomes a "long" identifier backed
//! by a chunked string cell. The packing scheme is taken verbatim from
//! the original engine's `pack_identifier`/`cog_explode_identifier` so
//! that equality and exploding stay contract-equivalent with it.

use crate::heap::CellRef;

/// Case-folded alphabet used to pack identifier text into an integer.
/// Index order matters: it defines the base-49 digit values.
pub const PACKED_ALPHABET: &[u8; 49] = b"0123456789abcdefghijklmnopqrstuvwxyz-?!'+/\\*>=<^.";

/// Longest text that can be represented as a packed identifier.
pub const MAX_PACKED_LEN: usize = 11;

/// An identifier: either packed into a tag-sized integer, a reference
/// to one of the interpreter's builtin function slots, or backed by a
/// chunked string cell for anything longer than [`MAX_PACKED_LEN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// `(value << 1) | 1`, matching the original engine's tagging.
    Packed(u64),
    /// Index into the interpreter's global builtin function table.
    Builtin(usize),
    /// Head cell of a chunked-string rope holding the identifier text.
    Long(CellRef),
}

impl Identifier {
    /// Attempts to pack `text` into a [`Identifier::Packed`] value.
    /// Returns `None` if `text` is empty, too long, or contains a byte
    /// outside [`PACKED_ALPHABET`] (case-insensitively).
    pub fn try_pack(text: &str) -> Option<Identifier> {
        if text.is_empty() || text.len() > MAX_PACKED_LEN {
            return None;
        }
        let base = PACKED_ALPHABET.len() as u64;
        let mut res: u64 = 0;
        for b in text.bytes() {
            let folded = b.to_ascii_lowercase();
            let index = PACKED_ALPHABET.iter().position(|&c| c == folded)?;
            res = res * base + index as u64;
        }
        Some(Identifier::Packed((res << 1) | 1))
    }

    /// Renders a packed identifier back to text: first symbol
    /// uppercase, remaining symbols lowercase, matching the original
    /// engine's `cog_explode_identifier`.
    pub fn explode_packed(packed: u64) -> String {
        debug_assert_eq!(packed & 1, 1, "explode_packed called on an unpacked value");
        let mut s = packed >> 1;
        let base = PACKED_ALPHABET.len() as u64;

        if s == 0 {
            return (PACKED_ALPHABET[0] as char).to_uppercase().to_string();
        }

        let mut div: u64 = 1;
        while div.saturating_mul(base) <= s {
            div *= base;
        }

        let mut out = String::with_capacity(MAX_PACKED_LEN);
        let mut first = true;
        loop {
            let digit = (s / div) % base;
            let ch = PACKED_ALPHABET[digit as usize] as char;
            if first {
                out.extend(ch.to_uppercase());
                first = false;
            } else {
                out.push(ch);
            }
            if div == 1 {
                break;
            }
            div /= base;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_short_identifiers() {
        assert!(matches!(Identifier::try_pack("foo"), Some(Identifier::Packed(_))));
        assert!(Identifier::try_pack("").is_none());
        assert!(Identifier::try_pack("twelve-chars").is_none()); // 12 chars
    }

    #[test]
    fn round_trips_through_explode() {
        for text in ["x", "foo", "Dup", "cmp-ci", "a1"] {
            let Identifier::Packed(p) = Identifier::try_pack(text).unwrap() else {
                panic!("expected packed");
            };
            let rendered = Identifier::explode_packed(p);
            // First letter uppercase, rest lowercase, remaining text
            // case-folded to lowercase to compare against the source.
            let mut expected = text.to_lowercase();
            let first = expected.remove(0).to_ascii_uppercase();
            expected.insert(0, first);
            assert_eq!(rendered, expected);
        }
    }

    #[test]
    fn rejects_out_of_alphabet_bytes() {
        assert!(Identifier::try_pack("foo bar").is_none());
        assert!(Identifier::try_pack("foo@bar").is_none());
    }

    #[test]
    fn eleven_chars_pack_twelve_does_not() {
        assert!(Identifier::try_pack("01234567890").is_some()); // 11 chars
        assert!(Identifier::try_pack("012345678901").is_none()); // 12 chars
    }
}
