//! ASCII case vectorizer.
//!
//! Copies a run of ASCII code units from `input` to `output`, flipping the
//! case of letters on the way, and stops at the first element that is not
//! ASCII. Both the byte form (UTF-8) and the 16-bit form (UTF-16) go through
//! the same kernels at their own element width.
//!
//! Three interchangeable kernels sit behind [`CaseStrategy`]:
//!
//! - [`CaseStrategy::Scalar`]: one element at a time; the reference semantics.
//! - [`CaseStrategy::Swar`]: eight bytes or four units per `u64` word.
//! - [`CaseStrategy::Sse2`]: sixteen bytes or eight units per 128-bit register
//!   (x86-64 only; other targets fall back to SWAR).
//!
//! All three return the same count and write the same prefix for the same
//! input. Output past the returned count is unspecified.

mod scalar;
pub(crate) mod simple;
#[cfg(target_arch = "x86_64")]
mod sse2;
mod swar;

/// Element types the vectorizer understands: `u8` and `u16`.
pub(crate) trait AsciiUnit: Copy + Default + Into<u32> {
    /// Smallest value that stops the copy.
    ///
    /// `0x7F` for bytes, `0x80` for 16-bit units.
    const FIRST_NON_ASCII: u32;

    /// Narrows a value already known to fit.
    fn from_u32(value: u32) -> Self;
}

impl AsciiUnit for u8 {
    const FIRST_NON_ASCII: u32 = 0x7F;

    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    fn from_u32(value: u32) -> Self {
        value as u8
    }
}

impl AsciiUnit for u16 {
    const FIRST_NON_ASCII: u32 = 0x80;

    #[inline]
    #[expect(clippy::cast_possible_truncation)]
    fn from_u32(value: u32) -> Self {
        value as u16
    }
}

/// First letter of the range that gets flipped.
#[inline]
pub(crate) const fn alpha_base(to_upper: bool) -> u8 {
    if to_upper { b'a' } else { b'A' }
}

/// Which kernel performs the ASCII case flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseStrategy {
    /// One element per step.
    Scalar,
    /// One `u64` word per step.
    Swar,
    /// One SSE2 register per step. Behaves as [`CaseStrategy::Swar`] off
    /// x86-64.
    Sse2,
}

#[cfg(all(target_arch = "x86_64", target_feature = "sse2"))]
const DETECTED: CaseStrategy = CaseStrategy::Sse2;
#[cfg(not(all(target_arch = "x86_64", target_feature = "sse2")))]
const DETECTED: CaseStrategy = CaseStrategy::Swar;

impl CaseStrategy {
    /// Every strategy, for callers that want to compare them.
    pub const ALL: [CaseStrategy; 3] = [CaseStrategy::Scalar, CaseStrategy::Swar, CaseStrategy::Sse2];

    /// The widest kernel the compilation target supports.
    #[must_use]
    #[inline]
    pub const fn detect() -> Self {
        DETECTED
    }

    /// Case-flips the ASCII prefix of a byte buffer. See [`change_case_ascii`].
    #[inline]
    pub fn change_case_bytes(self, input: &[u8], output: &mut [u8], to_upper: bool) -> usize {
        match self {
            CaseStrategy::Scalar => scalar::change_case(input, output, to_upper),
            CaseStrategy::Swar => swar::change_case(input, output, to_upper),
            #[cfg(target_arch = "x86_64")]
            CaseStrategy::Sse2 => sse2::change_case_bytes(input, output, to_upper),
            #[cfg(not(target_arch = "x86_64"))]
            CaseStrategy::Sse2 => swar::change_case(input, output, to_upper),
        }
    }

    /// Case-flips the ASCII prefix of a UTF-16 buffer. See
    /// [`change_case_ascii_utf16`].
    #[inline]
    pub fn change_case_units(self, input: &[u16], output: &mut [u16], to_upper: bool) -> usize {
        match self {
            CaseStrategy::Scalar => scalar::change_case(input, output, to_upper),
            CaseStrategy::Swar => swar::change_case(input, output, to_upper),
            #[cfg(target_arch = "x86_64")]
            CaseStrategy::Sse2 => sse2::change_case_units(input, output, to_upper),
            #[cfg(not(target_arch = "x86_64"))]
            CaseStrategy::Sse2 => swar::change_case(input, output, to_upper),
        }
    }
}

/// Copies `input` to `output`, flipping ASCII letter case, until the first
/// byte `>= 0x7F`.
///
/// With `to_upper` the letters `a..=z` become uppercase, otherwise `A..=Z`
/// become lowercase. Returns the number of bytes copied. Processing covers at
/// most `min(input.len(), output.len())` bytes, and `output` past the return
/// value is unspecified.
///
/// # Examples
///
/// ```rust
/// use unitext::change_case_ascii;
///
/// let mut out = [0u8; 8];
/// let n = change_case_ascii(b"Hi, \xC3\xA9t\xC3\xA9", &mut out, true);
/// assert_eq!(&out[..n], b"HI, ");
/// ```
#[inline]
pub fn change_case_ascii(input: &[u8], output: &mut [u8], to_upper: bool) -> usize {
    CaseStrategy::detect().change_case_bytes(input, output, to_upper)
}

/// The 16-bit form of [`change_case_ascii`]; stops at the first unit above
/// `0x7F`.
#[inline]
pub fn change_case_ascii_utf16(input: &[u16], output: &mut [u16], to_upper: bool) -> usize {
    CaseStrategy::detect().change_case_units(input, output, to_upper)
}

const IN_PLACE_CHUNK: usize = 64;

/// In-place rendition built on a copying kernel. Elements past the returned
/// count keep their original values.
fn change_case_in_place<T: AsciiUnit>(
    buf: &mut [T],
    to_upper: bool,
    kernel: impl Fn(&[T], &mut [T], bool) -> usize,
) -> usize {
    let mut tmp = [T::default(); IN_PLACE_CHUNK];
    let mut done = 0;
    for chunk in buf.chunks_mut(IN_PLACE_CHUNK) {
        let tmp = &mut tmp[..chunk.len()];
        tmp.copy_from_slice(chunk);
        let n = kernel(tmp, chunk, to_upper);
        done += n;
        if n < chunk.len() {
            chunk[n..].copy_from_slice(&tmp[n..]);
            break;
        }
    }
    done
}

/// Case-flips the ASCII prefix of `buf` in place and returns its length.
#[inline]
pub(crate) fn change_case_ascii_in_place(buf: &mut [u8], to_upper: bool) -> usize {
    let strategy = CaseStrategy::detect();
    change_case_in_place(buf, to_upper, |i, o, up| strategy.change_case_bytes(i, o, up))
}

/// Case-flips the ASCII prefix of `buf` in place and returns its length.
#[inline]
pub(crate) fn change_case_ascii_utf16_in_place(buf: &mut [u16], to_upper: bool) -> usize {
    let strategy = CaseStrategy::detect();
    change_case_in_place(buf, to_upper, |i, o, up| strategy.change_case_units(i, o, up))
}
