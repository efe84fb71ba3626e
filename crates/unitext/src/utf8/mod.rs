//! UTF-8 structural reader.
//!
//! [`peek_first_scalar`] and [`peek_last_scalar`] look at one sequence at the
//! front or back of a buffer without scanning the rest of it. Everything else
//! in the crate that needs to decide "is this well formed, and how far do I
//! skip if not" goes through [`peek_first_scalar`], so error recovery is the
//! same everywhere.
//!
//! Ill-formed input is measured by its *maximal subpart*: the longest prefix
//! that could still have begun a well-formed sequence, or one byte if there is
//! no such prefix. That length is always 1 to 3.

pub mod change_case;

use crate::{
    InvalidSequenceBehavior,
    scalar::UnicodeScalar,
    status::{CodeUnitCounts, SequenceValidity},
};

/// What sits at the front (or back) of a UTF-8 buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Utf8Peek {
    /// A complete, minimal, non-surrogate sequence.
    WellFormed {
        /// The decoded value.
        scalar: UnicodeScalar,
        /// Bytes in the sequence (1 to 4).
        len: usize,
    },
    /// The buffer ends on a proper prefix of some well-formed sequence.
    Incomplete {
        /// Bytes of that prefix present in the buffer (0 for an empty buffer).
        len: usize,
    },
    /// The bytes can never become part of a well-formed sequence.
    Invalid {
        /// Bytes to skip to step past the ill-formed unit (1 to 3).
        len: usize,
    },
}

impl Utf8Peek {
    /// The classification without its payload.
    #[must_use]
    #[inline]
    pub fn validity(&self) -> SequenceValidity {
        match self {
            Utf8Peek::WellFormed { .. } => SequenceValidity::WellFormed,
            Utf8Peek::Incomplete { .. } => SequenceValidity::Incomplete,
            Utf8Peek::Invalid { .. } => SequenceValidity::InvalidSequence,
        }
    }

    /// Bytes covered by this peek.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        match *self {
            Utf8Peek::WellFormed { len, .. }
            | Utf8Peek::Incomplete { len }
            | Utf8Peek::Invalid { len } => len,
        }
    }

    /// `true` only for an empty buffer.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The scalar, when well formed.
    #[must_use]
    #[inline]
    pub fn scalar(&self) -> Option<UnicodeScalar> {
        match *self {
            Utf8Peek::WellFormed { scalar, .. } => Some(scalar),
            Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. } => None,
        }
    }
}

/// Result of a full scan for the first ill-formed sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Utf8Inspection {
    /// Byte offset of the first ill-formed (or truncated) sequence, if any.
    pub first_invalid: Option<usize>,
    /// UTF-16 code units needed for the well-formed prefix.
    pub utf16_len: usize,
    /// Scalars in the well-formed prefix.
    pub scalar_count: usize,
}

#[inline]
pub(crate) const fn is_continuation(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

/// Width of the sequence started by `lead`, the accepted range of the second
/// byte, and the payload bits carried by the lead byte.
#[inline]
const fn lead_byte_info(lead: u8) -> Option<(usize, u8, u8, u32)> {
    let bits2 = (lead & 0x1F) as u32;
    let bits3 = (lead & 0x0F) as u32;
    let bits4 = (lead & 0x07) as u32;
    match lead {
        0xC2..=0xDF => Some((2, 0x80, 0xBF, bits2)),
        // E0 80..9F would be overlong.
        0xE0 => Some((3, 0xA0, 0xBF, bits3)),
        // ED A0..BF would encode a surrogate.
        0xED => Some((3, 0x80, 0x9F, bits3)),
        0xE1..=0xEC | 0xEE..=0xEF => Some((3, 0x80, 0xBF, bits3)),
        // F0 80..8F would be overlong.
        0xF0 => Some((4, 0x90, 0xBF, bits4)),
        0xF1..=0xF3 => Some((4, 0x80, 0xBF, bits4)),
        // F4 90..BF would exceed U+10FFFF.
        0xF4 => Some((4, 0x80, 0x8F, bits4)),
        _ => None,
    }
}

/// Classifies and measures the first sequence of `input`.
///
/// Only the bytes of that sequence are inspected.
///
/// # Examples
///
/// ```rust
/// use unitext::{Utf8Peek, peek_first_scalar};
///
/// assert!(matches!(peek_first_scalar("€uro".as_bytes()), Utf8Peek::WellFormed { len: 3, .. }));
/// assert_eq!(peek_first_scalar(&[0xE2, 0x82]), Utf8Peek::Incomplete { len: 2 });
/// // the three-byte form of U+D800
/// assert_eq!(peek_first_scalar(&[0xED, 0xA0, 0x80]), Utf8Peek::Invalid { len: 1 });
/// ```
#[must_use]
#[inline]
pub fn peek_first_scalar(input: &[u8]) -> Utf8Peek {
    let Some(&lead) = input.first() else {
        return Utf8Peek::Incomplete { len: 0 };
    };
    if lead < 0x80 {
        return Utf8Peek::WellFormed {
            scalar: UnicodeScalar::new_unchecked(u32::from(lead)),
            len: 1,
        };
    }

    let Some((width, second_lo, second_hi, mut value)) = lead_byte_info(lead) else {
        return Utf8Peek::Invalid { len: 1 };
    };

    for i in 1..width {
        let Some(&byte) = input.get(i) else {
            return Utf8Peek::Incomplete { len: i };
        };
        let (lo, hi) = if i == 1 {
            (second_lo, second_hi)
        } else {
            (0x80, 0xBF)
        };
        if byte < lo || byte > hi {
            return Utf8Peek::Invalid { len: i };
        }
        value = (value << 6) | u32::from(byte & 0x3F);
    }

    Utf8Peek::WellFormed {
        scalar: UnicodeScalar::new_unchecked(value),
        len: width,
    }
}

/// Classifies and measures the last sequence of `input`.
///
/// Walks back over at most three continuation bytes to find a lead byte. A
/// trailing valid prefix is [`Utf8Peek::Incomplete`]; any other trailing
/// garbage is a one-byte [`Utf8Peek::Invalid`], so trimming from the end also
/// advances deterministically.
#[must_use]
pub fn peek_last_scalar(input: &[u8]) -> Utf8Peek {
    let Some(&last) = input.last() else {
        return Utf8Peek::Incomplete { len: 0 };
    };
    if last < 0x80 {
        return Utf8Peek::WellFormed {
            scalar: UnicodeScalar::new_unchecked(u32::from(last)),
            len: 1,
        };
    }

    let end = input.len();
    for back in 1..=end.min(4) {
        let start = end - back;
        if is_continuation(input[start]) {
            continue;
        }
        return match peek_first_scalar(&input[start..]) {
            Utf8Peek::WellFormed { scalar, len } if len == back => {
                Utf8Peek::WellFormed { scalar, len }
            }
            Utf8Peek::Incomplete { len } if len == back => Utf8Peek::Incomplete { len },
            _ => Utf8Peek::Invalid { len: 1 },
        };
    }
    Utf8Peek::Invalid { len: 1 }
}

/// Length of the leading run of bytes below `0x80`.
#[inline]
pub(crate) fn ascii_prefix_len(input: &[u8]) -> usize {
    const HIGH: u64 = 0x8080_8080_8080_8080;
    let mut i = 0;
    for chunk in input.chunks_exact(8) {
        let word = u64::from_le_bytes([
            chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
        ]);
        let high = word & HIGH;
        if high != 0 {
            return i + (high.trailing_zeros() / 8) as usize;
        }
        i += 8;
    }
    i + input[i..].iter().take_while(|b| b.is_ascii()).count()
}

/// Bytes an ill-formed peek asks the caller to skip when the input is final.
///
/// A truncated sequence at the end of final input is one ill-formed unit
/// covering everything that remains.
#[inline]
pub(crate) fn invalid_run_len(peek: Utf8Peek, remaining: usize) -> usize {
    match peek {
        Utf8Peek::Incomplete { .. } => remaining,
        Utf8Peek::WellFormed { len, .. } | Utf8Peek::Invalid { len } => len,
    }
}

/// `true` when `input` is entirely well-formed UTF-8. O(n).
#[must_use]
pub fn is_well_formed(input: &[u8]) -> bool {
    inspect(input).first_invalid.is_none()
}

/// Scans `input` for its first ill-formed sequence.
///
/// The counts cover everything before that sequence (or the whole buffer).
/// A truncated sequence at the end counts as ill-formed.
///
/// # Examples
///
/// ```rust
/// use unitext::inspect_utf8;
///
/// let report = inspect_utf8(b"ab\xF0\x9F\x98\x80c\xFF");
/// assert_eq!(report.first_invalid, Some(7));
/// assert_eq!(report.utf16_len, 5);
/// assert_eq!(report.scalar_count, 4);
/// ```
#[must_use]
pub fn inspect(input: &[u8]) -> Utf8Inspection {
    let mut report = Utf8Inspection::default();
    let mut i = 0;
    while i < input.len() {
        let ascii = ascii_prefix_len(&input[i..]);
        i += ascii;
        report.utf16_len += ascii;
        report.scalar_count += ascii;
        if i == input.len() {
            break;
        }
        match peek_first_scalar(&input[i..]) {
            Utf8Peek::WellFormed { scalar, len } => {
                i += len;
                report.utf16_len += scalar.utf16_len();
                report.scalar_count += 1;
            }
            Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. } => {
                report.first_invalid = Some(i);
                return report;
            }
        }
    }
    report
}

/// Sizes the UTF-16 form of `input` under `behavior`.
///
/// Returns `None` only for [`InvalidSequenceBehavior::Fail`] on ill-formed
/// input. Under [`InvalidSequenceBehavior::ReplaceInvalidSequence`] each
/// ill-formed sequence costs one code unit; under
/// [`InvalidSequenceBehavior::LeaveUnchanged`] one code unit per byte.
#[must_use]
pub fn utf16_len_of_utf8(input: &[u8], behavior: InvalidSequenceBehavior) -> Option<CodeUnitCounts> {
    let mut counts = CodeUnitCounts::default();
    let mut i = 0;
    while i < input.len() {
        let ascii = ascii_prefix_len(&input[i..]);
        i += ascii;
        counts.code_units += ascii;
        counts.scalars += ascii;
        if i == input.len() {
            break;
        }
        let rest = &input[i..];
        match peek_first_scalar(rest) {
            Utf8Peek::WellFormed { scalar, len } => {
                i += len;
                counts.code_units += scalar.utf16_len();
                counts.scalars += 1;
            }
            peek @ (Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. }) => {
                let len = invalid_run_len(peek, rest.len());
                match behavior {
                    InvalidSequenceBehavior::Fail => return None,
                    InvalidSequenceBehavior::ReplaceInvalidSequence => counts.code_units += 1,
                    InvalidSequenceBehavior::LeaveUnchanged => counts.code_units += len,
                }
                counts.scalars += 1;
                i += len;
            }
        }
    }
    Some(counts)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn well_formed(value: u32, len: usize) -> Utf8Peek {
        Utf8Peek::WellFormed {
            scalar: UnicodeScalar::new(value).unwrap(),
            len,
        }
    }

    #[rstest]
    #[case(b"A", well_formed(0x41, 1))]
    #[case(b"\xC4\x80", well_formed(0x100, 2))]
    #[case(b"\xE2\x82\xAC", well_formed(0x20AC, 3))]
    #[case(b"\xF0\x9F\x98\x80", well_formed(0x1F600, 4))]
    #[case(b"\xF4\x8F\xBF\xBF", well_formed(0x10FFFF, 4))]
    #[case(b"\xEF\xBF\xBDtail", well_formed(0xFFFD, 3))]
    #[case(b"", Utf8Peek::Incomplete { len: 0 })]
    #[case(b"\xC4", Utf8Peek::Incomplete { len: 1 })]
    #[case(b"\xE2\x82", Utf8Peek::Incomplete { len: 2 })]
    #[case(b"\xF0\x9F\x98", Utf8Peek::Incomplete { len: 3 })]
    #[case(b"\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xBF\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xC0\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xC1\xBF", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xE0\x80\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xED\xA0\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xF0\x80\x80\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xF4\x90\x80\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xF5\x80\x80\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xFF", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xE2\x82A", Utf8Peek::Invalid { len: 2 })]
    #[case(b"\xF0\x9F\x98A", Utf8Peek::Invalid { len: 3 })]
    #[case(b"\xC4A", Utf8Peek::Invalid { len: 1 })]
    fn peek_first_cases(#[case] input: &[u8], #[case] expected: Utf8Peek) {
        assert_eq!(peek_first_scalar(input), expected);
    }

    #[rstest]
    #[case(b"abc", well_formed(0x63, 1))]
    #[case(b"x\xE2\x82\xAC", well_formed(0x20AC, 3))]
    #[case(b"\xF0\x9F\x98\x80", well_formed(0x1F600, 4))]
    #[case(b"", Utf8Peek::Incomplete { len: 0 })]
    #[case(b"a\xF0\x9F\x98", Utf8Peek::Incomplete { len: 3 })]
    #[case(b"a\xE2", Utf8Peek::Incomplete { len: 1 })]
    #[case(b"a\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\x80\x80\x80\x80\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xE2\x82\xAC\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xED\xA0\x80", Utf8Peek::Invalid { len: 1 })]
    #[case(b"\xC0", Utf8Peek::Invalid { len: 1 })]
    fn peek_last_cases(#[case] input: &[u8], #[case] expected: Utf8Peek) {
        assert_eq!(peek_last_scalar(input), expected);
    }

    #[test]
    fn surrogate_range_is_never_well_formed() {
        for value in 0xD800u32..=0xDFFF {
            let bytes = [
                (0xE0 | (value >> 12)) as u8,
                (0x80 | ((value >> 6) & 0x3F)) as u8,
                (0x80 | (value & 0x3F)) as u8,
            ];
            assert_eq!(
                peek_first_scalar(&bytes).validity(),
                SequenceValidity::InvalidSequence
            );
        }
    }

    #[test]
    fn inspection_counts_prefix() {
        assert_eq!(
            inspect("héllo😀".as_bytes()),
            Utf8Inspection {
                first_invalid: None,
                utf16_len: 7,
                scalar_count: 6
            }
        );
        assert_eq!(inspect(b"abc\xE2\x82").first_invalid, Some(3));
        assert!(is_well_formed(b""));
        assert!(!is_well_formed(b"\xC0\xAF"));
    }

    #[test]
    fn ascii_prefix_spans_words() {
        assert_eq!(ascii_prefix_len(b""), 0);
        assert_eq!(ascii_prefix_len(b"0123456789abcdef"), 16);
        assert_eq!(ascii_prefix_len(b"0123456789\xC3\xA9"), 10);
        assert_eq!(ascii_prefix_len(b"\x80"), 0);
        assert_eq!(ascii_prefix_len(b"01234567\xFF"), 8);
    }

    #[rstest]
    #[case(InvalidSequenceBehavior::Fail, None)]
    #[case(
        InvalidSequenceBehavior::ReplaceInvalidSequence,
        Some(CodeUnitCounts { code_units: 5, scalars: 4 })
    )]
    #[case(
        InvalidSequenceBehavior::LeaveUnchanged,
        Some(CodeUnitCounts { code_units: 6, scalars: 4 })
    )]
    fn utf16_sizing(#[case] behavior: InvalidSequenceBehavior, #[case] expected: Option<CodeUnitCounts>) {
        // a, U+1F600, [E2 82] cut short by b, b
        let input = b"a\xF0\x9F\x98\x80\xE2\x82b";
        assert_eq!(utf16_len_of_utf8(input, behavior), expected);
    }

    #[test]
    fn every_scalar_round_trips_through_both_peeks() {
        use crate::{ScalarError, scalar::try_encode_scalar};

        let mut buf = [0u8; 4];
        for value in 0..=0x10_FFFFi32 {
            let encoded = try_encode_scalar(value, &mut buf);
            if (0xD800..=0xDFFF).contains(&value) {
                assert!(matches!(encoded, Err(ScalarError::ValueOutOfRange(_))), "{value:#X}");
                continue;
            }
            let len = encoded.unwrap();
            let expected = well_formed(value.unsigned_abs(), len);
            assert_eq!(peek_first_scalar(&buf[..len]), expected, "{value:#X}");
            assert_eq!(peek_last_scalar(&buf[..len]), expected, "{value:#X}");
            for cut in 1..len {
                assert_eq!(
                    peek_first_scalar(&buf[..cut]),
                    Utf8Peek::Incomplete { len: cut },
                    "{value:#X} cut at {cut}"
                );
            }
        }
    }
}
