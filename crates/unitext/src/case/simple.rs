//! Simple (one-to-one) case mapping for scalars outside ASCII.
//!
//! A mapping is taken only when the standard library yields exactly one
//! scalar, that scalar is not ASCII, and its UTF-16 length matches the input.
//! Everything else maps to itself. So `ß` stays `ß` (its uppercase is two
//! scalars), and `ı`/`ſ` never fold onto ASCII `I`/`S`.

#[inline]
fn single_mapping(ch: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) if !m.is_ascii() && m.len_utf16() == ch.len_utf16() => m,
        _ => ch,
    }
}

/// Invariant simple uppercase.
#[inline]
pub(crate) fn to_upper(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_uppercase()
    } else {
        single_mapping(ch, ch.to_uppercase())
    }
}

/// Invariant simple lowercase.
#[inline]
pub(crate) fn to_lower(ch: char) -> char {
    if ch.is_ascii() {
        ch.to_ascii_lowercase()
    } else {
        single_mapping(ch, ch.to_lowercase())
    }
}

#[inline]
pub(crate) fn fold(ch: char, to_upper_case: bool) -> char {
    if to_upper_case { to_upper(ch) } else { to_lower(ch) }
}

/// [`fold`] over a raw value; non-scalars map to themselves.
#[inline]
pub(crate) fn fold_value(value: u32, to_upper_case: bool) -> u32 {
    char::from_u32(value).map_or(value, |ch| u32::from(fold(ch, to_upper_case)))
}
