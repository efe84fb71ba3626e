//! Ordinal and case-insensitive hashing over raw buffers.
//!
//! # Case-insensitive UTF-8
//!
//! [`StringComparison::OrdinalIgnoreCase`] over UTF-8 hashes a byte stream
//! built without allocating:
//!
//! 1. The leading ASCII run (bytes below `0x7F`), uppercased.
//! 2. If anything remains, the mode-switch word `0x00FF00FF` (little endian).
//! 3. The rest as uppercased UTF-16 code units (little endian), transcoded in
//!    fixed chunks.
//! 4. Each ill-formed UTF-8 sequence of `n` bytes as the unit `0xDF00 | n`
//!    followed by its raw bytes, after which step 3 resumes.
//!
//! `0xDF0n` is a lone low surrogate, which well-formed UTF-16 never contains
//! at a scalar boundary, so every byte stream has exactly one reading. Two
//! inputs that differ only in malformed bytes cannot be forced to collide.
//! The hash agrees with [`eq_ordinal_ignore_case`].

use alloc::string::String;
use core::{
    fmt,
    hash::{Hash, Hasher},
};

use bstr::BStr;
use log::trace;

use crate::{
    HashOptions, InvalidSequenceBehavior,
    case::{change_case_ascii, simple},
    marvin::StreamingMarvin,
    scalar::is_high_surrogate,
    status::OperationStatus,
    transcode::{to_valid_utf8_string, transcode_to_utf16},
    utf8::{Utf8Peek, invalid_run_len, peek_first_scalar},
    utf16::to_upper_invariant_in_place,
};

const SCRATCH_LEN: usize = 512;
const MODE_SWITCH: u32 = 0x00FF_00FF;
const INVALID_RUN_BASE: u16 = 0xDF00;

/// Culture-aware hashing supplied by the caller.
///
/// This crate has no locale data; [`StringComparison::Culture`] hands the
/// text (with invalid sequences replaced by U+FFFD) to an implementation of
/// this trait.
pub trait CultureCollator {
    /// Hashes `text` under the rules of `locale`.
    fn hash(&self, text: &str, locale: &str, ignore_case: bool) -> i32;
}

/// How text is compared, and therefore hashed.
#[derive(Clone, Copy)]
pub enum StringComparison<'a> {
    /// Code-unit equality.
    Ordinal,
    /// Code-unit equality after invariant simple uppercasing.
    OrdinalIgnoreCase,
    /// Delegates to a caller-supplied collator.
    Culture {
        /// The collator that does the hashing.
        collator: &'a dyn CultureCollator,
        /// Locale identifier passed through to the collator.
        locale: &'a str,
        /// Passed through to the collator.
        ignore_case: bool,
    },
}

impl fmt::Debug for StringComparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringComparison::Ordinal => f.write_str("Ordinal"),
            StringComparison::OrdinalIgnoreCase => f.write_str("OrdinalIgnoreCase"),
            StringComparison::Culture {
                locale, ignore_case, ..
            } => f
                .debug_struct("Culture")
                .field("locale", locale)
                .field("ignore_case", ignore_case)
                .finish_non_exhaustive(),
        }
    }
}

/// Hashes UTF-8 `input` under `comparison` with the default seed.
///
/// # Examples
///
/// ```rust
/// use unitext::{StringComparison, hash_utf8};
///
/// let a = hash_utf8("Straße".as_bytes(), StringComparison::OrdinalIgnoreCase);
/// let b = hash_utf8("STRAßE".as_bytes(), StringComparison::OrdinalIgnoreCase);
/// assert_eq!(a, b);
/// ```
#[must_use]
pub fn hash_utf8(input: &[u8], comparison: StringComparison<'_>) -> i32 {
    hash_utf8_with(input, comparison, &HashOptions::default())
}

/// Hashes UTF-8 `input` under `comparison` with the seed from `options`.
///
/// The seed does not apply to [`StringComparison::Culture`].
#[must_use]
pub fn hash_utf8_with(input: &[u8], comparison: StringComparison<'_>, options: &HashOptions) -> i32 {
    let mut marvin = StreamingMarvin::new(options.seed);
    match comparison {
        StringComparison::Ordinal => marvin.consume(input),
        StringComparison::OrdinalIgnoreCase => consume_utf8_ignore_case(&mut marvin, input),
        StringComparison::Culture {
            collator,
            locale,
            ignore_case,
        } => return collator.hash(&to_valid_utf8_string(input), locale, ignore_case),
    }
    marvin.finish()
}

#[expect(clippy::cast_possible_truncation)]
fn consume_utf8_ignore_case(marvin: &mut StreamingMarvin, input: &[u8]) {
    let mut rest = input;

    let mut bytes = [0u8; SCRATCH_LEN];
    loop {
        let take = rest.len().min(SCRATCH_LEN);
        let n = change_case_ascii(&rest[..take], &mut bytes[..take], true);
        marvin.consume(&bytes[..n]);
        rest = &rest[n..];
        if n < take || rest.is_empty() {
            break;
        }
    }
    if rest.is_empty() {
        return;
    }

    trace!("ignore-case hash leaving ASCII after {} bytes", input.len() - rest.len());
    marvin.consume(&MODE_SWITCH.to_le_bytes());

    let mut units = [0u16; SCRATCH_LEN];
    while !rest.is_empty() {
        let result = transcode_to_utf16(rest, &mut units, true, InvalidSequenceBehavior::Fail);
        let chunk = &mut units[..result.written];
        to_upper_invariant_in_place(chunk);
        consume_units(marvin, chunk);
        rest = &rest[result.consumed..];

        match result.status {
            OperationStatus::Done | OperationStatus::DestinationTooSmall => {}
            OperationStatus::InvalidData | OperationStatus::NeedMoreData => {
                debug_assert_eq!(result.status, OperationStatus::InvalidData);
                let len = invalid_run_len(peek_first_scalar(rest), rest.len());
                trace!("ignore-case hash folding {len}-byte invalid run");
                marvin.consume(&(INVALID_RUN_BASE | len as u16).to_le_bytes());
                marvin.consume(&rest[..len]);
                rest = &rest[len..];
            }
        }
    }
}

/// Feeds `units` as little-endian bytes.
fn consume_units(marvin: &mut StreamingMarvin, units: &[u16]) {
    let mut bytes = [0u8; 2 * SCRATCH_LEN];
    for chunk in units.chunks(SCRATCH_LEN) {
        for (dst, unit) in bytes.chunks_exact_mut(2).zip(chunk) {
            dst.copy_from_slice(&unit.to_le_bytes());
        }
        marvin.consume(&bytes[..2 * chunk.len()]);
    }
}

/// Hashes UTF-16 `input` under `comparison` with the default seed.
///
/// Ordinal hashing covers the little-endian bytes of the units. Ignoring case
/// hashes the invariant uppercase form, which has the same length.
#[must_use]
pub fn hash_utf16(input: &[u16], comparison: StringComparison<'_>) -> i32 {
    hash_utf16_with(input, comparison, &HashOptions::default())
}

/// Hashes UTF-16 `input` under `comparison` with the seed from `options`.
#[must_use]
pub fn hash_utf16_with(input: &[u16], comparison: StringComparison<'_>, options: &HashOptions) -> i32 {
    let mut marvin = StreamingMarvin::new(options.seed);
    match comparison {
        StringComparison::Ordinal => consume_units(&mut marvin, input),
        StringComparison::OrdinalIgnoreCase => {
            let mut scratch = [0u16; SCRATCH_LEN];
            let mut rest = input;
            while !rest.is_empty() {
                let mut take = rest.len().min(SCRATCH_LEN);
                // Keep pairs together so each chunk folds on its own.
                if take < rest.len() && is_high_surrogate(rest[take - 1]) {
                    take -= 1;
                }
                let chunk = &mut scratch[..take];
                chunk.copy_from_slice(&rest[..take]);
                to_upper_invariant_in_place(chunk);
                consume_units(&mut marvin, chunk);
                rest = &rest[take..];
            }
        }
        StringComparison::Culture {
            collator,
            locale,
            ignore_case,
        } => {
            let text: String = char::decode_utf16(input.iter().copied())
                .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect();
            return collator.hash(&text, locale, ignore_case);
        }
    }
    marvin.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FoldToken<'a> {
    Scalar(char),
    Invalid(&'a [u8]),
}

/// The sequence of uppercased scalars and raw invalid runs of a UTF-8 buffer.
struct FoldTokens<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for FoldTokens<'a> {
    type Item = FoldToken<'a>;

    fn next(&mut self) -> Option<FoldToken<'a>> {
        if self.rest.is_empty() {
            return None;
        }
        let (token, len) = match peek_first_scalar(self.rest) {
            Utf8Peek::WellFormed { scalar, len } => {
                (FoldToken::Scalar(simple::to_upper(scalar.to_char())), len)
            }
            peek @ (Utf8Peek::Incomplete { .. } | Utf8Peek::Invalid { .. }) => {
                let len = invalid_run_len(peek, self.rest.len());
                (FoldToken::Invalid(&self.rest[..len]), len)
            }
        };
        self.rest = &self.rest[len..];
        Some(token)
    }
}

/// Case-insensitive ordinal equality of two UTF-8 buffers.
///
/// Scalars compare after invariant simple uppercasing. Ill-formed sequences
/// compare byte for byte and never equal a scalar. Equal inputs always have
/// equal [`StringComparison::OrdinalIgnoreCase`] hashes.
///
/// # Examples
///
/// ```rust
/// use unitext::eq_ordinal_ignore_case;
///
/// assert!(eq_ordinal_ignore_case("ǅemal".as_bytes(), "ǄEMAL".as_bytes()));
/// assert!(!eq_ordinal_ignore_case("ıd".as_bytes(), b"ID"));
/// ```
#[must_use]
pub fn eq_ordinal_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a == b || FoldTokens { rest: a }.eq(FoldTokens { rest: b })
}

/// UTF-8 bytes that hash and compare ignoring case.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
///
/// use unitext::IgnoreCaseUtf8;
///
/// let mut seen = HashSet::new();
/// assert!(seen.insert(IgnoreCaseUtf8("Köln".as_bytes())));
/// assert!(!seen.insert(IgnoreCaseUtf8("KÖLN".as_bytes())));
/// ```
#[derive(Clone, Copy)]
pub struct IgnoreCaseUtf8<'a>(pub &'a [u8]);

impl fmt::Debug for IgnoreCaseUtf8<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IgnoreCaseUtf8").field(&BStr::new(self.0)).finish()
    }
}

impl PartialEq for IgnoreCaseUtf8<'_> {
    fn eq(&self, other: &Self) -> bool {
        eq_ordinal_ignore_case(self.0, other.0)
    }
}

impl Eq for IgnoreCaseUtf8<'_> {}

impl Hash for IgnoreCaseUtf8<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(hash_utf8(self.0, StringComparison::OrdinalIgnoreCase));
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString, vec::Vec};
    use core::cell::Cell;

    use rstest::rstest;

    use super::*;

    const IGNORE_CASE: StringComparison<'static> = StringComparison::OrdinalIgnoreCase;

    #[rstest]
    #[case(b"hello", b"HELLO")]
    #[case("Grüße".as_bytes(), "GRÜßE".as_bytes())]
    #[case("ωmega\x7F".as_bytes(), "ΩMEGA\x7F".as_bytes())]
    #[case(b"bad\xFFtail", b"BAD\xFFTAIL")]
    #[case(b"x\xE2\x82", b"X\xE2\x82")]
    fn equal_inputs_hash_equal(#[case] a: &[u8], #[case] b: &[u8]) {
        assert!(eq_ordinal_ignore_case(a, b));
        assert_eq!(hash_utf8(a, IGNORE_CASE), hash_utf8(b, IGNORE_CASE));
    }

    #[rstest]
    #[case(&[0xD8, 0xD8, 0xDF, 0xDF], &[0xF1, 0x86, 0x8F, 0x9F])]
    #[case(b"\xFF", b"\xFE")]
    #[case(b"\xE2\x82", b"\xE2")]
    #[case("ı".as_bytes(), b"I")]
    #[case(b"abc", b"abd")]
    fn distinct_inputs(#[case] a: &[u8], #[case] b: &[u8]) {
        assert!(!eq_ordinal_ignore_case(a, b));
        assert_ne!(hash_utf8(a, IGNORE_CASE), hash_utf8(b, IGNORE_CASE));
    }

    #[test]
    fn ordinal_hash_is_marvin_over_bytes() {
        let mut m = StreamingMarvin::default_seed();
        m.consume(b"Hello");
        assert_eq!(hash_utf8(b"Hello", StringComparison::Ordinal), m.finish());
        assert_ne!(
            hash_utf8(b"Hello", StringComparison::Ordinal),
            hash_utf8(b"HELLO", StringComparison::Ordinal)
        );
    }

    #[test]
    fn ascii_only_input_hashes_uppercase_bytes() {
        let mut m = StreamingMarvin::default_seed();
        m.consume(b"MIXED CASE");
        assert_eq!(hash_utf8(b"mixed Case", IGNORE_CASE), m.finish());
    }

    #[test]
    fn long_inputs_cross_scratch_boundaries() {
        let lower: Vec<u8> = "aé😀".repeat(700).into_bytes();
        let upper: Vec<u8> = "AÉ😀".repeat(700).into_bytes();
        assert_eq!(hash_utf8(&lower, IGNORE_CASE), hash_utf8(&upper, IGNORE_CASE));

        let ascii_then_rest = format!("{}é", "q".repeat(1500));
        let upper = ascii_then_rest.to_uppercase();
        assert_eq!(
            hash_utf8(ascii_then_rest.as_bytes(), IGNORE_CASE),
            hash_utf8(upper.as_bytes(), IGNORE_CASE)
        );
    }

    #[test]
    fn utf16_hashes() {
        let lower: Vec<u16> = "straße 😀 ω".encode_utf16().collect();
        let upper: Vec<u16> = "STRAßE 😀 Ω".encode_utf16().collect();
        assert_eq!(hash_utf16(&lower, IGNORE_CASE), hash_utf16(&upper, IGNORE_CASE));
        assert_ne!(
            hash_utf16(&lower, StringComparison::Ordinal),
            hash_utf16(&upper, StringComparison::Ordinal)
        );

        let mut m = StreamingMarvin::default_seed();
        m.consume(&[0x41, 0x00, 0x00, 0xD8]);
        assert_eq!(hash_utf16(&[0x41, 0xD800], StringComparison::Ordinal), m.finish());
    }

    #[test]
    fn utf16_chunks_keep_pairs_together() {
        let mut lower: Vec<u16> = "a".repeat(511).encode_utf16().collect();
        lower.extend("𐐨".encode_utf16());
        let mut upper: Vec<u16> = "A".repeat(511).encode_utf16().collect();
        upper.extend("𐐀".encode_utf16());
        assert_eq!(hash_utf16(&lower, IGNORE_CASE), hash_utf16(&upper, IGNORE_CASE));
    }

    struct RecordingCollator {
        seen: Cell<Option<(usize, bool)>>,
    }

    impl CultureCollator for RecordingCollator {
        fn hash(&self, text: &str, locale: &str, ignore_case: bool) -> i32 {
            self.seen.set(Some((text.len(), ignore_case)));
            i32::try_from(text.len() + locale.len()).unwrap()
        }
    }

    #[test]
    fn culture_delegates_with_replacement() {
        let collator = RecordingCollator { seen: Cell::new(None) };
        let comparison = StringComparison::Culture {
            collator: &collator,
            locale: "tr-TR",
            ignore_case: true,
        };
        // "a" + U+FFFD
        assert_eq!(hash_utf8(b"a\xFF", comparison), 4 + 5);
        assert_eq!(collator.seen.get(), Some((4, true)));
        assert_eq!(hash_utf16(&[0x61, 0xDC00], comparison), 4 + 5);
        assert!(format!("{comparison:?}").starts_with("Culture { locale: \"tr-TR\""));
    }

    #[test]
    fn ignore_case_wrapper() {
        let a = IgnoreCaseUtf8(b"Key");
        let b = IgnoreCaseUtf8(b"kEY");
        assert_eq!(a, b);
        let builder = crate::MarvinBuildHasher::default();
        assert_eq!(
            core::hash::BuildHasher::hash_one(&builder, a),
            core::hash::BuildHasher::hash_one(&builder, b)
        );
        assert_eq!(format!("{a:?}"), "IgnoreCaseUtf8(\"Key\")".to_string());
    }
}
