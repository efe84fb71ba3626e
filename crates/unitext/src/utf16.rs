//! UTF-16 reading and invariant case conversion.
//!
//! Case conversion here never changes the number of code units: the simple
//! mapping only pairs scalars of equal UTF-16 length, and lone surrogates are
//! copied through. That lets callers convert in place and lets the hash engine
//! fold fixed-size chunks.

use crate::{
    case::{self, simple},
    scalar::{
        UnicodeScalar, combine_surrogates, is_high_surrogate, is_low_surrogate, is_surrogate,
        split_surrogates,
    },
};

/// One item at the front of a UTF-16 buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Utf16Peek {
    /// A scalar and the units it occupies (1 or 2).
    Scalar(UnicodeScalar, usize),
    /// A high surrogate that is the last unit of the buffer.
    TrailingHigh(u16),
    /// A surrogate with no partner.
    Lone(u16),
    Empty,
}

#[inline]
pub(crate) fn peek_first(input: &[u16]) -> Utf16Peek {
    match *input {
        [] => Utf16Peek::Empty,
        [high, low, ..] if is_high_surrogate(high) && is_low_surrogate(low) => {
            Utf16Peek::Scalar(UnicodeScalar::new_unchecked(combine_surrogates(high, low)), 2)
        }
        [high] if is_high_surrogate(high) => Utf16Peek::TrailingHigh(high),
        [unit, ..] if is_surrogate(u32::from(unit)) => Utf16Peek::Lone(unit),
        [unit, ..] => Utf16Peek::Scalar(UnicodeScalar::new_unchecked(u32::from(unit)), 1),
    }
}

/// Folds the non-ASCII item at the front of `input`, returning the new units
/// and how many were consumed (always equal).
#[inline]
#[expect(clippy::cast_possible_truncation)]
fn fold_front(input: &[u16], to_upper: bool) -> ([u16; 2], usize) {
    match peek_first(input) {
        Utf16Peek::Scalar(scalar, 2) => {
            let (high, low) = split_surrogates(simple::fold_value(scalar.value(), to_upper));
            ([high, low], 2)
        }
        Utf16Peek::Scalar(scalar, _) => ([simple::fold_value(scalar.value(), to_upper) as u16, 0], 1),
        Utf16Peek::TrailingHigh(unit) | Utf16Peek::Lone(unit) => ([unit, 0], 1),
        Utf16Peek::Empty => ([0, 0], 0),
    }
}

fn change_case(input: &[u16], output: &mut [u16], to_upper: bool) -> usize {
    let len = input.len().min(output.len());
    let mut i = 0;
    while i < len {
        i += case::change_case_ascii_utf16(&input[i..len], &mut output[i..len], to_upper);
        if i == len {
            break;
        }
        let (units, n) = fold_front(&input[i..], to_upper);
        if i + n > len {
            // A surrogate pair that does not fit.
            break;
        }
        output[i..i + n].copy_from_slice(&units[..n]);
        i += n;
    }
    i
}

fn change_case_in_place(buf: &mut [u16], to_upper: bool) {
    let mut i = 0;
    while i < buf.len() {
        i += case::change_case_ascii_utf16_in_place(&mut buf[i..], to_upper);
        if i == buf.len() {
            break;
        }
        let (units, n) = fold_front(&buf[i..], to_upper);
        buf[i..i + n].copy_from_slice(&units[..n]);
        i += n;
    }
}

/// Writes the invariant uppercase of `input` to `output`.
///
/// Returns the number of units processed, which is also the number written.
/// Stops early only when `output` is short, and never between the halves of
/// a surrogate pair. Lone surrogates are copied unchanged.
///
/// # Examples
///
/// ```rust
/// let input: Vec<u16> = "straße ω".encode_utf16().collect();
/// let mut output = vec![0u16; input.len()];
/// let n = unitext::utf16::to_upper_invariant(&input, &mut output);
/// assert_eq!(String::from_utf16(&output[..n]).unwrap(), "STRAßE Ω");
/// ```
#[inline]
pub fn to_upper_invariant(input: &[u16], output: &mut [u16]) -> usize {
    change_case(input, output, true)
}

/// Writes the invariant lowercase of `input` to `output`. See
/// [`to_upper_invariant`].
#[inline]
pub fn to_lower_invariant(input: &[u16], output: &mut [u16]) -> usize {
    change_case(input, output, false)
}

/// Uppercases `buf` in place.
#[inline]
pub fn to_upper_invariant_in_place(buf: &mut [u16]) {
    change_case_in_place(buf, true);
}

/// Lowercases `buf` in place.
#[inline]
pub fn to_lower_invariant_in_place(buf: &mut [u16]) {
    change_case_in_place(buf, false);
}
