//! Caller-selected knobs shared by the conversion and hashing entry points.

use crate::marvin::DEFAULT_SEED;

/// What a conversion does when it meets an ill-formed sequence.
///
/// # Default
///
/// [`InvalidSequenceBehavior::ReplaceInvalidSequence`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidSequenceBehavior {
    /// Substitute U+FFFD for each invalid sequence and keep going.
    ///
    /// Conversions under this behavior never report
    /// [`OperationStatus::InvalidData`](crate::OperationStatus::InvalidData).
    #[default]
    ReplaceInvalidSequence,
    /// Stop in front of the first invalid sequence and report
    /// [`OperationStatus::InvalidData`](crate::OperationStatus::InvalidData).
    Fail,
    /// Carry the offending code units through in an encoding-specific form.
    ///
    /// - UTF-8 to UTF-8 copies the bytes verbatim.
    /// - UTF-8 to UTF-16 writes each byte `b` as the lone low surrogate
    ///   `0xDD00 + b`.
    /// - UTF-16 to UTF-8 writes a lone surrogate in its generalized three-byte
    ///   form.
    /// - UTF-16 to UTF-16 copies the unit verbatim.
    LeaveUnchanged,
}

/// Configuration for the hash engine.
///
/// # Examples
///
/// ```rust
/// use unitext::{HashOptions, StringComparison, hash_utf8_with};
///
/// let options = HashOptions { seed: 0x0123_4567_89AB_CDEF };
/// let a = hash_utf8_with(b"Hello", StringComparison::OrdinalIgnoreCase, &options);
/// let b = hash_utf8_with(b"HELLO", StringComparison::OrdinalIgnoreCase, &options);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashOptions {
    /// Seed fed to the Marvin accumulator.
    ///
    /// Hashes computed with different seeds are unrelated. Consumers exposed
    /// to untrusted keys should pick a seed the attacker cannot observe.
    ///
    /// # Default
    ///
    /// [`DEFAULT_SEED`](crate::DEFAULT_SEED)
    pub seed: u64,
}

impl Default for HashOptions {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}
