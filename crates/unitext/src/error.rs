use alloc::vec::Vec;
use core::fmt;

use bstr::BStr;
use thiserror::Error;

/// Failure to produce the encoded form of a scalar value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarError {
    /// The value is negative, above `U+10FFFF`, or a surrogate code point.
    #[error("value {0:#X} is not a Unicode scalar value")]
    ValueOutOfRange(u32),
    /// The output buffer cannot hold the encoded form.
    #[error("destination too small: {required} code units required, {available} available")]
    DestinationTooSmall {
        /// Code units the encoded form needs.
        required: usize,
        /// Code units the caller provided.
        available: usize,
    },
}

/// Malformed input encountered by a conversion that does not repair it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid sequence {} at offset {offset}", InvalidBytes(.bytes))]
pub struct InvalidDataError {
    /// Offset, in input code units, of the first invalid sequence.
    pub offset: usize,
    /// The invalid sequence itself, widened to `u16` for UTF-16 input.
    pub bytes: Vec<u16>,
}

impl InvalidDataError {
    pub(crate) fn from_utf8(offset: usize, bytes: &[u8]) -> Self {
        Self {
            offset,
            bytes: bytes.iter().map(|&b| u16::from(b)).collect(),
        }
    }

    pub(crate) fn from_utf16(offset: usize, units: &[u16]) -> Self {
        Self {
            offset,
            bytes: units.to_vec(),
        }
    }
}

struct InvalidBytes<'a>(&'a [u16]);

impl fmt::Display for InvalidBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(bytes) = self
            .0
            .iter()
            .map(|&u| u8::try_from(u).ok())
            .collect::<Option<Vec<u8>>>()
        {
            write!(f, "{:?}", BStr::new(&bytes))
        } else {
            f.write_str("[")?;
            for (i, unit) in self.0.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{unit:04X}")?;
            }
            f.write_str("]")
        }
    }
}
