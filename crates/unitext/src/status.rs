//! Result vocabulary for bounded conversions and structural peeks.

/// Outcome of a bounded conversion call. Exactly one holds per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationStatus {
    /// All input was consumed.
    Done,
    /// The input ends inside a sequence and the caller said more may follow.
    NeedMoreData,
    /// The next unit of output does not fit.
    DestinationTooSmall,
    /// Malformed input was met under
    /// [`InvalidSequenceBehavior::Fail`](crate::InvalidSequenceBehavior::Fail).
    /// The first unconsumed input element starts the invalid sequence.
    InvalidData,
}

/// Status plus progress of a bounded conversion.
///
/// `consumed` counts input code units and `written` counts output code units.
/// Both describe the prefix that was fully processed; the caller resumes at
/// `input[consumed..]` and `output[written..]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperationResult {
    /// Why the call returned.
    pub status: OperationStatus,
    /// Input code units consumed.
    pub consumed: usize,
    /// Output code units written.
    pub written: usize,
}

impl OperationResult {
    #[inline]
    pub(crate) const fn new(status: OperationStatus, consumed: usize, written: usize) -> Self {
        Self {
            status,
            consumed,
            written,
        }
    }

    /// `true` when the status is [`OperationStatus::Done`].
    #[must_use]
    #[inline]
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }
}

/// Classification of the first or last sequence in a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SequenceValidity {
    /// The sequence decodes to a scalar value.
    WellFormed,
    /// The buffer ends on a proper prefix of some well-formed sequence.
    Incomplete,
    /// No continuation can make the sequence valid.
    InvalidSequence,
}

/// Counts of code units and scalars produced by a sizing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CodeUnitCounts {
    /// Code units in the target encoding.
    pub code_units: usize,
    /// Scalars, counting each replaced or carried-through invalid sequence as
    /// one.
    pub scalars: usize,
}
