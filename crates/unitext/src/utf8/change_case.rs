//! Invariant case conversion from UTF-8 to UTF-8.
//!
//! ASCII runs go through the vectorizer; everything else is decoded, mapped
//! with the simple case mapping and re-encoded. The byte length may change
//! (for example `ɐ` is two bytes and `Ɐ` three), the UTF-16 length never does.

use log::trace;

use super::{Utf8Peek, invalid_run_len, peek_first_scalar};
use crate::{
    InvalidSequenceBehavior,
    case::{change_case_ascii, simple},
    scalar::UnicodeScalar,
    status::{OperationResult, OperationStatus},
};

fn change_case(
    input: &[u8],
    output: &mut [u8],
    is_final_block: bool,
    behavior: InvalidSequenceBehavior,
    to_upper: bool,
) -> OperationResult {
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let n = change_case_ascii(&input[consumed..], &mut output[written..], to_upper);
        consumed += n;
        written += n;

        let rest = &input[consumed..];
        if rest.is_empty() {
            return OperationResult::new(OperationStatus::Done, consumed, written);
        }
        let out = &mut output[written..];

        match peek_first_scalar(rest) {
            Utf8Peek::WellFormed { scalar, len } => {
                let mapped = UnicodeScalar::from_char(simple::fold(scalar.to_char(), to_upper));
                let Ok(width) = mapped.encode_utf8(out) else {
                    return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
                };
                consumed += len;
                written += width;
            }
            Utf8Peek::Incomplete { .. } if !is_final_block => {
                return OperationResult::new(OperationStatus::NeedMoreData, consumed, written);
            }
            peek @ (Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. }) => {
                let len = invalid_run_len(peek, rest.len());
                let width = match behavior {
                    InvalidSequenceBehavior::Fail => {
                        trace!("case conversion stopped on invalid UTF-8 at offset {consumed}");
                        return OperationResult::new(OperationStatus::InvalidData, consumed, written);
                    }
                    InvalidSequenceBehavior::ReplaceInvalidSequence => {
                        UnicodeScalar::REPLACEMENT_CHAR.encode_utf8(out).ok()
                    }
                    InvalidSequenceBehavior::LeaveUnchanged => out.get_mut(..len).map(|dst| {
                        dst.copy_from_slice(&rest[..len]);
                        len
                    }),
                };
                let Some(width) = width else {
                    return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
                };
                consumed += len;
                written += width;
            }
        }
    }
}

/// Writes the invariant uppercase of `input` to `output`.
///
/// `consumed` counts input bytes and `written` output bytes. With
/// `is_final_block` unset, a truncated sequence at the end yields
/// [`OperationStatus::NeedMoreData`]; with it set, the truncated bytes are one
/// invalid sequence handled per `behavior`.
///
/// # Examples
///
/// ```rust
/// use unitext::{InvalidSequenceBehavior, OperationStatus, utf8::change_case};
///
/// let mut out = [0u8; 16];
/// let result = change_case::to_upper_invariant(
///     "déjà vu".as_bytes(),
///     &mut out,
///     true,
///     InvalidSequenceBehavior::Fail,
/// );
/// assert_eq!(result.status, OperationStatus::Done);
/// assert_eq!(&out[..result.written], "DÉJÀ VU".as_bytes());
/// ```
#[inline]
pub fn to_upper_invariant(
    input: &[u8],
    output: &mut [u8],
    is_final_block: bool,
    behavior: InvalidSequenceBehavior,
) -> OperationResult {
    change_case(input, output, is_final_block, behavior, true)
}

/// Writes the invariant lowercase of `input` to `output`. See
/// [`to_upper_invariant`].
#[inline]
pub fn to_lower_invariant(
    input: &[u8],
    output: &mut [u8],
    is_final_block: bool,
    behavior: InvalidSequenceBehavior,
) -> OperationResult {
    change_case(input, output, is_final_block, behavior, false)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use rstest::rstest;

    use super::*;

    const FAIL: InvalidSequenceBehavior = InvalidSequenceBehavior::Fail;
    const REPLACE: InvalidSequenceBehavior = InvalidSequenceBehavior::ReplaceInvalidSequence;
    const LEAVE: InvalidSequenceBehavior = InvalidSequenceBehavior::LeaveUnchanged;

    #[rstest]
    #[case(b"", b"", REPLACE)]
    #[case(b"abc\x7Fdef", b"ABC\x7FDEF", FAIL)]
    #[case("ɐ ω".as_bytes(), "Ɐ Ω".as_bytes(), FAIL)]
    #[case(b"a\xFFb", b"A\xEF\xBF\xBDB", REPLACE)]
    #[case(b"a\xFFb", b"A\xFFB", LEAVE)]
    #[case(b"x\xE2\x82", b"X\xE2\x82", LEAVE)]
    #[case(b"x\xE2\x82", b"X\xEF\xBF\xBD", REPLACE)]
    fn uppercases_final_blocks(
        #[case] input: &[u8],
        #[case] expected: &[u8],
        #[case] behavior: InvalidSequenceBehavior,
    ) {
        let mut out = vec![0u8; input.len() * 3];
        let result = to_upper_invariant(input, &mut out, true, behavior);
        assert_eq!(result.status, OperationStatus::Done);
        assert_eq!(result.consumed, input.len());
        assert_eq!(&out[..result.written], expected);
    }

    #[test]
    fn lowercases() {
        let mut out = [0u8; 32];
        let result = to_lower_invariant("ÀB𐐀ΣC".as_bytes(), &mut out, true, FAIL);
        assert!(result.is_done());
        assert_eq!(&out[..result.written], "àb𐐨σc".as_bytes());
    }

    #[test]
    fn stops_before_invalid_under_fail() {
        let mut out = [0u8; 8];
        let result = to_upper_invariant(b"ab\xC0cd", &mut out, true, FAIL);
        assert_eq!(result, OperationResult::new(OperationStatus::InvalidData, 2, 2));
    }

    #[test]
    fn asks_for_more_on_truncated_tail() {
        let mut out = [0u8; 8];
        let result = to_upper_invariant(b"ab\xC3", &mut out, false, FAIL);
        assert_eq!(result, OperationResult::new(OperationStatus::NeedMoreData, 2, 2));
    }

    #[test]
    fn reports_short_output_without_partial_scalars() {
        let mut out = [0u8; 3];
        let result = to_upper_invariant("aɐ".as_bytes(), &mut out, true, FAIL);
        assert_eq!(result, OperationResult::new(OperationStatus::DestinationTooSmall, 1, 1));

        let mut out = [0u8; 2];
        let result = to_upper_invariant(b"ab\xFF", &mut out, true, REPLACE);
        assert_eq!(result, OperationResult::new(OperationStatus::DestinationTooSmall, 2, 2));
    }
}
