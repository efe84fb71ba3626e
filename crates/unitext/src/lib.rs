//! Unicode text primitives over raw UTF-8 and UTF-16 buffers.
//!
//! Everything here works on caller-owned slices and reports progress instead
//! of allocating:
//!
//! - scalar encoding ([`try_encode_scalar`], [`UnicodeScalar`]);
//! - structural peeks and validation ([`peek_first_scalar`],
//!   [`peek_last_scalar`], [`is_well_formed`], [`Utf8StreamingValidator`]);
//! - chunked transcoding with a configurable policy for malformed input
//!   ([`transcode_to_utf16`], [`transcode_from_utf16`]);
//! - vectorized ASCII case conversion ([`change_case_ascii`]) and invariant
//!   case conversion for all scalars ([`utf8::change_case`], [`utf16`]);
//! - Marvin32 hashing, including a case-insensitive ordinal hash that stays
//!   collision resistant on malformed UTF-8 ([`hash_utf8`]).
//!
//! ```rust
//! use unitext::{InvalidSequenceBehavior, OperationStatus, StringComparison, hash_utf8, transcode_to_utf16};
//!
//! let mut utf16 = [0u16; 16];
//! let result = transcode_to_utf16("Grüße".as_bytes(), &mut utf16, true, InvalidSequenceBehavior::Fail);
//! assert_eq!(result.status, OperationStatus::Done);
//! assert_eq!(result.written, 5);
//!
//! assert_eq!(
//!     hash_utf8(b"content-type", StringComparison::OrdinalIgnoreCase),
//!     hash_utf8(b"Content-Type", StringComparison::OrdinalIgnoreCase),
//! );
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod case;
mod chunk_utils;
mod error;
mod hash;
mod marvin;
mod options;
mod scalar;
mod status;
mod transcode;
pub mod utf16;
pub mod utf8;
mod validator;

#[cfg(test)]
mod tests;

pub use case::{CaseStrategy, change_case_ascii, change_case_ascii_utf16};
pub use chunk_utils::{produce_chunks, produce_prefixes, split_by_sizes};
pub use error::{InvalidDataError, ScalarError};
pub use hash::{
    CultureCollator, IgnoreCaseUtf8, StringComparison, eq_ordinal_ignore_case, hash_utf8,
    hash_utf8_with, hash_utf16, hash_utf16_with,
};
pub use marvin::{DEFAULT_SEED, MarvinBuildHasher, StreamingMarvin};
pub use options::{HashOptions, InvalidSequenceBehavior};
pub use scalar::{UnicodeScalar, try_encode_scalar};
pub use status::{CodeUnitCounts, OperationResult, OperationStatus, SequenceValidity};
pub use transcode::{
    convert_to_valid_utf8, from_utf16_vec, to_utf16_vec, to_valid_utf8_string,
    transcode_from_utf16, transcode_to_utf16, transcode_to_utf16_propagating, utf8_len_of_utf16,
};
pub use utf8::{
    Utf8Inspection, Utf8Peek, inspect as inspect_utf8, is_well_formed, peek_first_scalar,
    peek_last_scalar, utf16_len_of_utf8,
};
pub use validator::Utf8StreamingValidator;
