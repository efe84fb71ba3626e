//! Scalar codec: a single Unicode scalar value to and from its UTF-8 and
//! UTF-16 code units.
//!
//! Every encoder here either writes the complete minimal-width form or writes
//! nothing at all. Out-of-range input (negative, above `U+10FFFF`, or in the
//! surrogate gap) is reported as [`ScalarError::ValueOutOfRange`]; a short
//! buffer as [`ScalarError::DestinationTooSmall`].
//!
//! Bit layouts:
//!
//! | width | layout                                   |
//! |-------|------------------------------------------|
//! | 1     | `0xxxxxxx`                               |
//! | 2     | `110yyyyy 10xxxxxx`                      |
//! | 3     | `1110zzzz 10yyyyyy 10xxxxxx`             |
//! | 4     | `11110uuu 10uuzzzz 10yyyyyy 10xxxxxx`    |

use core::fmt;

use crate::error::ScalarError;

pub(crate) const MAX_SCALAR: u32 = 0x10_FFFF;
pub(crate) const SURROGATE_START: u32 = 0xD800;
pub(crate) const SURROGATE_END: u32 = 0xDFFF;
pub(crate) const HIGH_SURROGATE_END: u32 = 0xDBFF;

/// A Unicode scalar value: `0..=0xD7FF` or `0xE000..=0x10FFFF`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct UnicodeScalar(u32);

impl UnicodeScalar {
    /// U+FFFD REPLACEMENT CHARACTER.
    pub const REPLACEMENT_CHAR: UnicodeScalar = UnicodeScalar(0xFFFD);

    /// Validates `value` as a scalar.
    ///
    /// # Errors
    ///
    /// [`ScalarError::ValueOutOfRange`] for surrogates and values above
    /// `U+10FFFF`.
    #[inline]
    pub const fn new(value: u32) -> Result<Self, ScalarError> {
        if is_valid_scalar(value) {
            Ok(Self(value))
        } else {
            Err(ScalarError::ValueOutOfRange(value))
        }
    }

    /// Wraps a value already known to be a scalar.
    #[inline]
    pub(crate) const fn new_unchecked(value: u32) -> Self {
        debug_assert!(is_valid_scalar(value));
        Self(value)
    }

    /// Wraps a `char`, which is always a scalar.
    #[must_use]
    #[inline]
    pub const fn from_char(ch: char) -> Self {
        Self(ch as u32)
    }

    /// The code point value.
    #[must_use]
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// The scalar as a `char`.
    #[must_use]
    #[inline]
    pub fn to_char(self) -> char {
        // Construction guarantees the value is never a surrogate.
        char::from_u32(self.0).unwrap_or(char::REPLACEMENT_CHARACTER)
    }

    /// `true` for `U+0000..=U+007F`.
    #[must_use]
    #[inline]
    pub const fn is_ascii(self) -> bool {
        self.0 < 0x80
    }

    /// `true` when the UTF-16 form needs a surrogate pair.
    #[must_use]
    #[inline]
    pub const fn is_supplementary(self) -> bool {
        self.0 >= 0x1_0000
    }

    /// Bytes in the UTF-8 form (1 to 4).
    #[must_use]
    #[inline]
    pub const fn utf8_len(self) -> usize {
        utf8_width(self.0)
    }

    /// Code units in the UTF-16 form (1 or 2).
    #[must_use]
    #[inline]
    pub const fn utf16_len(self) -> usize {
        if self.is_supplementary() { 2 } else { 1 }
    }

    /// Writes the UTF-8 form to the front of `output` and returns its length.
    ///
    /// # Errors
    ///
    /// [`ScalarError::DestinationTooSmall`] when `output` is shorter than
    /// [`utf8_len`](Self::utf8_len). Nothing is written in that case.
    #[inline]
    pub fn encode_utf8(self, output: &mut [u8]) -> Result<usize, ScalarError> {
        let width = self.utf8_len();
        let Some(out) = output.get_mut(..width) else {
            return Err(ScalarError::DestinationTooSmall {
                required: width,
                available: output.len(),
            });
        };
        write_utf8(self.0, out);
        Ok(width)
    }

    /// Writes the UTF-16 form to the front of `output` and returns its length.
    ///
    /// # Errors
    ///
    /// [`ScalarError::DestinationTooSmall`] when `output` is shorter than
    /// [`utf16_len`](Self::utf16_len). Nothing is written in that case.
    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    pub fn encode_utf16(self, output: &mut [u16]) -> Result<usize, ScalarError> {
        match (self.is_supplementary(), output) {
            (false, [first, ..]) => {
                *first = self.0 as u16;
                Ok(1)
            }
            (true, [high, low, ..]) => {
                let (h, l) = split_surrogates(self.0);
                *high = h;
                *low = l;
                Ok(2)
            }
            (_, output) => Err(ScalarError::DestinationTooSmall {
                required: self.utf16_len(),
                available: output.len(),
            }),
        }
    }
}

impl fmt::Debug for UnicodeScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

impl fmt::Display for UnicodeScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_char(), f)
    }
}

impl From<char> for UnicodeScalar {
    fn from(ch: char) -> Self {
        Self::from_char(ch)
    }
}

impl From<UnicodeScalar> for char {
    fn from(scalar: UnicodeScalar) -> Self {
        scalar.to_char()
    }
}

impl From<UnicodeScalar> for u32 {
    fn from(scalar: UnicodeScalar) -> Self {
        scalar.0
    }
}

impl TryFrom<u32> for UnicodeScalar {
    type Error = ScalarError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encodes `value` as UTF-8 into the front of `output`.
///
/// `value` is an arbitrary integer: negative values and values outside the
/// scalar range are rejected rather than wrapped. ASCII values need only a
/// non-empty buffer.
///
/// # Errors
///
/// - [`ScalarError::ValueOutOfRange`] when `value` is not a scalar.
/// - [`ScalarError::DestinationTooSmall`] when `output` cannot hold the
///   encoded form.
///
/// Nothing is written on error.
///
/// # Examples
///
/// ```rust
/// use unitext::try_encode_scalar;
///
/// let mut buf = [0u8; 4];
/// assert_eq!(try_encode_scalar(0x20AC, &mut buf), Ok(3));
/// assert_eq!(&buf[..3], &[0xE2, 0x82, 0xAC]);
/// assert!(try_encode_scalar(-1, &mut buf).is_err());
/// ```
#[inline]
#[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn try_encode_scalar(value: i32, output: &mut [u8]) -> Result<usize, ScalarError> {
    let value = value as u32; // negatives land far above MAX_SCALAR
    if value < 0x80 {
        if let Some(first) = output.first_mut() {
            *first = value as u8;
            return Ok(1);
        }
    }
    UnicodeScalar::new(value)?.encode_utf8(output)
}

#[inline]
pub(crate) const fn is_valid_scalar(value: u32) -> bool {
    value <= MAX_SCALAR && !is_surrogate(value)
}

#[inline]
pub(crate) const fn is_surrogate(value: u32) -> bool {
    value >= SURROGATE_START && value <= SURROGATE_END
}

#[inline]
pub(crate) const fn is_high_surrogate(unit: u16) -> bool {
    unit as u32 >= SURROGATE_START && unit as u32 <= HIGH_SURROGATE_END
}

#[inline]
pub(crate) const fn is_low_surrogate(unit: u16) -> bool {
    unit as u32 > HIGH_SURROGATE_END && unit as u32 <= SURROGATE_END
}

#[inline]
pub(crate) const fn utf8_width(value: u32) -> usize {
    if value < 0x80 {
        1
    } else if value < 0x800 {
        2
    } else if value < 0x1_0000 {
        3
    } else {
        4
    }
}

#[inline]
pub(crate) const fn combine_surrogates(high: u16, low: u16) -> u32 {
    0x1_0000 + (((high as u32) - SURROGATE_START) << 10) + ((low as u32) - 0xDC00)
}

#[inline]
#[expect(clippy::cast_possible_truncation)]
pub(crate) const fn split_surrogates(value: u32) -> (u16, u16) {
    let v = value - 0x1_0000;
    ((0xD800 + (v >> 10)) as u16, (0xDC00 + (v & 0x3FF)) as u16)
}

/// Writes the UTF-8 form of `value`; `out.len()` must equal its width.
///
/// Also used for the generalized (surrogate-carrying) three-byte form, so the
/// value is not required to be a scalar.
#[inline]
#[expect(clippy::cast_possible_truncation)]
pub(crate) fn write_utf8(value: u32, out: &mut [u8]) {
    match out {
        [b0] => *b0 = value as u8,
        [b0, b1] => {
            *b0 = (0b1100_0000 | (value >> 6)) as u8;
            *b1 = (0b1000_0000 | (value & 0b0011_1111)) as u8;
        }
        [b0, b1, b2] => {
            *b0 = (0b1110_0000 | (value >> 12)) as u8;
            *b1 = (0b1000_0000 | ((value >> 6) & 0b0011_1111)) as u8;
            *b2 = (0b1000_0000 | (value & 0b0011_1111)) as u8;
        }
        [b0, b1, b2, b3] => {
            *b0 = (0b1111_0000 | (value >> 18)) as u8;
            *b1 = (0b1000_0000 | ((value >> 12) & 0b0011_1111)) as u8;
            *b2 = (0b1000_0000 | ((value >> 6) & 0b0011_1111)) as u8;
            *b3 = (0b1000_0000 | (value & 0b0011_1111)) as u8;
        }
        _ => unreachable!("UTF-8 width is 1..=4"),
    }
}
