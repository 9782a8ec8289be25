// src/graph/matching.rs
//! Word-boundary identifier matching shared by every reference signal.

/// Returns true if `identifier` occurs in `content` as a whole word.
///
/// A whole word is bounded on both sides by a non-identifier byte or by the
/// start/end of `content`. Matching is purely textual: comments and string
/// literals count.
#[must_use]
pub fn references(content: &str, identifier: &str) -> bool {
    let Some(first) = identifier.chars().next() else {
        return false;
    };
    let bytes = content.as_bytes();
    let mut from = 0;
    while let Some(offset) = content[from..].find(identifier) {
        let start = from + offset;
        let end = start + identifier.len();
        let clear_before = start == 0 || !is_ident_byte(bytes[start - 1]);
        let clear_after = end >= bytes.len() || !is_ident_byte(bytes[end]);
        if clear_before && clear_after {
            return true;
        }
        // Step one char so overlapping candidates are still considered.
        from = start + first.len_utf8();
    }
    false
}

#[must_use]
pub const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
