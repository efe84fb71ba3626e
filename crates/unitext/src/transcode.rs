//! Chunked UTF-8 ↔ UTF-16 transcoding.
//!
//! Every entry point is bounded by both buffers and reports progress through
//! [`OperationResult`], so callers can stream arbitrarily large input through
//! fixed scratch space. Output is always a whole number of scalars: a
//! surrogate pair or multi-byte sequence is written completely or not at all.

use alloc::{borrow::Cow, string::String, vec, vec::Vec};

use log::trace;

use crate::{
    InvalidSequenceBehavior,
    error::InvalidDataError,
    scalar::{UnicodeScalar, write_utf8},
    status::{CodeUnitCounts, OperationResult, OperationStatus},
    utf8::{Utf8Peek, ascii_prefix_len, inspect, invalid_run_len, peek_first_scalar},
    utf16::{Utf16Peek, peek_first},
};

/// Base of the lone low surrogates that carry invalid bytes into UTF-16.
pub(crate) const PROPAGATED_BYTE_BASE: u16 = 0xDD00;

const REPLACEMENT_UTF8_LEN: usize = 3;

/// Transcodes UTF-8 to UTF-16.
///
/// `consumed` counts bytes and `written` counts UTF-16 code units.
///
/// - A sequence truncated by the end of `utf8` yields
///   [`OperationStatus::NeedMoreData`] unless `is_final_block` is set, in
///   which case it is one invalid sequence.
/// - [`InvalidSequenceBehavior::Fail`] stops in front of an invalid sequence
///   with [`OperationStatus::InvalidData`].
/// - [`InvalidSequenceBehavior::ReplaceInvalidSequence`] writes one U+FFFD per
///   invalid sequence.
/// - [`InvalidSequenceBehavior::LeaveUnchanged`] writes each invalid byte `b`
///   as `0xDD00 + b`.
///
/// # Examples
///
/// ```rust
/// use unitext::{InvalidSequenceBehavior, OperationStatus, transcode_to_utf16};
///
/// let mut out = [0u16; 8];
/// let result = transcode_to_utf16(b"a\xF0\x9F\x98", &mut out, false, InvalidSequenceBehavior::Fail);
/// assert_eq!(result.status, OperationStatus::NeedMoreData);
/// assert_eq!((result.consumed, result.written), (1, 1));
///
/// let result = transcode_to_utf16(b"a\xFFb", &mut out, true, InvalidSequenceBehavior::ReplaceInvalidSequence);
/// assert!(result.is_done());
/// assert_eq!(&out[..result.written], &[0x61, 0xFFFD, 0x62]);
/// ```
pub fn transcode_to_utf16(
    utf8: &[u8],
    utf16_out: &mut [u16],
    is_final_block: bool,
    behavior: InvalidSequenceBehavior,
) -> OperationResult {
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let rest = &utf8[consumed..];
        let out = &mut utf16_out[written..];

        let ascii = ascii_prefix_len(rest).min(out.len());
        for (dst, &src) in out[..ascii].iter_mut().zip(rest) {
            *dst = u16::from(src);
        }
        consumed += ascii;
        written += ascii;

        let rest = &rest[ascii..];
        let out = &mut out[ascii..];
        if rest.is_empty() {
            return OperationResult::new(OperationStatus::Done, consumed, written);
        }

        match peek_first_scalar(rest) {
            Utf8Peek::WellFormed { scalar, len } => {
                let Ok(width) = scalar.encode_utf16(out) else {
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
                        trace!("UTF-8 to UTF-16 stopped on invalid data at byte {consumed}");
                        return OperationResult::new(OperationStatus::InvalidData, consumed, written);
                    }
                    InvalidSequenceBehavior::ReplaceInvalidSequence => {
                        UnicodeScalar::REPLACEMENT_CHAR.encode_utf16(out).ok()
                    }
                    InvalidSequenceBehavior::LeaveUnchanged => {
                        propagate_bytes(&rest[..len], out).then_some(len)
                    }
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

/// Writes each byte as `0xDD00 + byte`; `false` when `out` is too short.
#[inline]
fn propagate_bytes(bytes: &[u8], out: &mut [u16]) -> bool {
    let Some(out) = out.get_mut(..bytes.len()) else {
        return false;
    };
    for (dst, &b) in out.iter_mut().zip(bytes) {
        *dst = PROPAGATED_BYTE_BASE + u16::from(b);
    }
    true
}

/// Transcodes UTF-16 to UTF-8.
///
/// `consumed` counts UTF-16 code units and `written` counts bytes. A high
/// surrogate at the end of a non-final block yields
/// [`OperationStatus::NeedMoreData`]; any other unpaired surrogate is an
/// invalid sequence handled per `behavior`. Under
/// [`InvalidSequenceBehavior::LeaveUnchanged`] it is written in the
/// generalized three-byte form (`ED A0..BF 80..BF`), which is not valid UTF-8.
#[expect(clippy::cast_possible_truncation)]
pub fn transcode_from_utf16(
    utf16: &[u16],
    utf8_out: &mut [u8],
    is_final_block: bool,
    behavior: InvalidSequenceBehavior,
) -> OperationResult {
    let mut consumed = 0;
    let mut written = 0;
    while consumed < utf16.len() {
        let rest = &utf16[consumed..];
        let out = &mut utf8_out[written..];

        let mut ascii = 0;
        for (dst, &src) in out.iter_mut().zip(rest) {
            if src >= 0x80 {
                break;
            }
            *dst = src as u8;
            ascii += 1;
        }
        consumed += ascii;
        written += ascii;
        if ascii > 0 {
            continue;
        }

        let (unit, len) = match peek_first(rest) {
            Utf16Peek::Scalar(scalar, len) => {
                let Ok(width) = scalar.encode_utf8(out) else {
                    return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
                };
                consumed += len;
                written += width;
                continue;
            }
            Utf16Peek::TrailingHigh(_) if !is_final_block => {
                return OperationResult::new(OperationStatus::NeedMoreData, consumed, written);
            }
            Utf16Peek::TrailingHigh(unit) | Utf16Peek::Lone(unit) => (unit, 1),
            Utf16Peek::Empty => break,
        };

        let width = match behavior {
            InvalidSequenceBehavior::Fail => {
                trace!("UTF-16 to UTF-8 stopped on lone surrogate {unit:#06X} at unit {consumed}");
                return OperationResult::new(OperationStatus::InvalidData, consumed, written);
            }
            InvalidSequenceBehavior::ReplaceInvalidSequence => {
                UnicodeScalar::REPLACEMENT_CHAR.encode_utf8(out).ok()
            }
            InvalidSequenceBehavior::LeaveUnchanged => {
                out.get_mut(..3).map(|dst| {
                    write_utf8(u32::from(unit), dst);
                    3
                })
            }
        };
        let Some(width) = width else {
            return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
        };
        consumed += len;
        written += width;
    }
    OperationResult::new(OperationStatus::Done, consumed, written)
}

/// Transcodes UTF-8 to UTF-16, carrying each byte of every invalid sequence
/// through as the lone low surrogate `0xDD00 + byte`.
///
/// The result is reversible and distinguishes any two inputs. The input is
/// treated as a final block, so the status is [`OperationStatus::Done`] or
/// [`OperationStatus::DestinationTooSmall`]. No input byte ever needs more
/// than one code unit, so an output as long as the input always suffices.
///
/// # Examples
///
/// ```rust
/// use unitext::{OperationStatus, transcode_to_utf16_propagating};
///
/// let mut out = [0u16; 2];
/// let result = transcode_to_utf16_propagating(b"a\xFFb", &mut out);
/// assert_eq!(result.status, OperationStatus::DestinationTooSmall);
/// assert_eq!(&out[..result.written], &[0x61, 0xDDFF]);
/// ```
pub fn transcode_to_utf16_propagating(utf8: &[u8], utf16_out: &mut [u16]) -> OperationResult {
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let result = transcode_to_utf16(
            &utf8[consumed..],
            &mut utf16_out[written..],
            true,
            InvalidSequenceBehavior::Fail,
        );
        consumed += result.consumed;
        written += result.written;
        if result.status != OperationStatus::InvalidData {
            return OperationResult::new(result.status, consumed, written);
        }
        let rest = &utf8[consumed..];
        let len = invalid_run_len(peek_first_scalar(rest), rest.len());
        if !propagate_bytes(&rest[..len], &mut utf16_out[written..]) {
            return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
        }
        consumed += len;
        written += len;
    }
}

/// Copies `input` to `output`, replacing each invalid sequence with U+FFFD.
///
/// Never reports [`OperationStatus::InvalidData`]. A truncated sequence at the
/// end yields [`OperationStatus::NeedMoreData`] unless `is_final_block` is set.
pub fn convert_to_valid_utf8(input: &[u8], output: &mut [u8], is_final_block: bool) -> OperationResult {
    let mut consumed = 0;
    let mut written = 0;
    loop {
        let rest = &input[consumed..];
        let out = &mut output[written..];

        let ascii = ascii_prefix_len(rest).min(out.len());
        out[..ascii].copy_from_slice(&rest[..ascii]);
        consumed += ascii;
        written += ascii;

        let rest = &rest[ascii..];
        let out = &mut out[ascii..];
        if rest.is_empty() {
            return OperationResult::new(OperationStatus::Done, consumed, written);
        }

        let (len, width) = match peek_first_scalar(rest) {
            Utf8Peek::WellFormed { len, .. } => (len, len),
            Utf8Peek::Incomplete { .. } if !is_final_block => {
                return OperationResult::new(OperationStatus::NeedMoreData, consumed, written);
            }
            peek @ (Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. }) => {
                (invalid_run_len(peek, rest.len()), REPLACEMENT_UTF8_LEN)
            }
        };
        let Some(dst) = out.get_mut(..width) else {
            return OperationResult::new(OperationStatus::DestinationTooSmall, consumed, written);
        };
        if width == len {
            dst.copy_from_slice(&rest[..len]);
        } else {
            write_utf8(UnicodeScalar::REPLACEMENT_CHAR.value(), dst);
        }
        consumed += len;
        written += width;
    }
}

/// Sizes the UTF-8 form of `utf16` under `behavior`.
///
/// Returns `None` for [`InvalidSequenceBehavior::Fail`] on an unpaired
/// surrogate, or when the byte count overflows `usize`. Both other behaviors
/// spend three bytes per unpaired surrogate.
#[must_use]
pub fn utf8_len_of_utf16(utf16: &[u16], behavior: InvalidSequenceBehavior) -> Option<CodeUnitCounts> {
    let mut counts = CodeUnitCounts::default();
    let mut i = 0;
    while i < utf16.len() {
        let (bytes, units) = match peek_first(&utf16[i..]) {
            Utf16Peek::Scalar(scalar, len) => (scalar.utf8_len(), len),
            Utf16Peek::TrailingHigh(_) | Utf16Peek::Lone(_) => {
                if behavior == InvalidSequenceBehavior::Fail {
                    return None;
                }
                (3, 1)
            }
            Utf16Peek::Empty => break,
        };
        counts.code_units = counts.code_units.checked_add(bytes)?;
        counts.scalars += 1;
        i += units;
    }
    Some(counts)
}

/// Decodes well-formed UTF-8 into a new UTF-16 buffer.
///
/// # Errors
///
/// [`InvalidDataError`] naming the first ill-formed sequence.
pub fn to_utf16_vec(utf8: &[u8]) -> Result<Vec<u16>, InvalidDataError> {
    let report = inspect(utf8);
    if let Some(offset) = report.first_invalid {
        let rest = &utf8[offset..];
        let len = invalid_run_len(peek_first_scalar(rest), rest.len());
        return Err(InvalidDataError::from_utf8(offset, &rest[..len]));
    }
    let mut out = vec![0u16; report.utf16_len];
    let result = transcode_to_utf16(utf8, &mut out, true, InvalidSequenceBehavior::Fail);
    debug_assert!(result.is_done() && result.written == out.len());
    Ok(out)
}

/// Decodes well-formed UTF-16 into a new `String`.
///
/// # Errors
///
/// [`InvalidDataError`] naming the first unpaired surrogate.
pub fn from_utf16_vec(utf16: &[u16]) -> Result<String, InvalidDataError> {
    let mut out = String::with_capacity(utf16.len());
    let mut i = 0;
    while i < utf16.len() {
        match peek_first(&utf16[i..]) {
            Utf16Peek::Scalar(scalar, len) => {
                out.push(scalar.to_char());
                i += len;
            }
            Utf16Peek::TrailingHigh(unit) | Utf16Peek::Lone(unit) => {
                return Err(InvalidDataError::from_utf16(i, &[unit]));
            }
            Utf16Peek::Empty => break,
        }
    }
    Ok(out)
}

/// Borrows `input` as `str` when it is well formed; otherwise copies it with
/// each invalid sequence replaced by U+FFFD.
///
/// # Examples
///
/// ```rust
/// use unitext::to_valid_utf8_string;
///
/// assert_eq!(to_valid_utf8_string(b"ok"), "ok");
/// assert_eq!(to_valid_utf8_string(b"a\xF0\x9F\x98b\xC0"), "a\u{FFFD}b\u{FFFD}");
/// ```
#[must_use]
pub fn to_valid_utf8_string(input: &[u8]) -> Cow<'_, str> {
    if let Ok(valid) = core::str::from_utf8(input) {
        return Cow::Borrowed(valid);
    }
    let mut out = String::with_capacity(input.len() + REPLACEMENT_UTF8_LEN);
    let mut rest = input;
    while !rest.is_empty() {
        let peek = peek_first_scalar(rest);
        let len = match peek.scalar() {
            Some(scalar) => {
                out.push(scalar.to_char());
                peek.len()
            }
            None => {
                out.push(char::REPLACEMENT_CHARACTER);
                invalid_run_len(peek, rest.len())
            }
        };
        rest = &rest[len..];
    }
    Cow::Owned(out)
}
