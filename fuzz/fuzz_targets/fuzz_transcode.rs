#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use unitext::{
    InvalidSequenceBehavior, OperationStatus, StringComparison, Utf8StreamingValidator,
    eq_ordinal_ignore_case, hash_utf8, split_by_sizes, transcode_from_utf16, transcode_to_utf16,
    transcode_to_utf16_propagating, utf8::change_case,
};

#[derive(Debug, Arbitrary)]
struct Input {
    bytes: Vec<u8>,
    sizes: Vec<u8>,
    behavior: u8,
}

fn behavior(tag: u8) -> InvalidSequenceBehavior {
    match tag % 3 {
        0 => InvalidSequenceBehavior::ReplaceInvalidSequence,
        1 => InvalidSequenceBehavior::Fail,
        _ => InvalidSequenceBehavior::LeaveUnchanged,
    }
}

/// Chunked and one-shot transcoding write the same units.
fn check_chunking(input: &Input) {
    let behavior = behavior(input.behavior);
    let sizes: Vec<usize> = input.sizes.iter().map(|&s| usize::from(s)).collect();
    let chunks = split_by_sizes(&input.bytes, &sizes);

    let mut whole = vec![0u16; input.bytes.len()];
    let expected = transcode_to_utf16(&input.bytes, &mut whole, true, behavior);

    let mut pending = Vec::new();
    let mut streamed = Vec::new();
    let mut status = OperationStatus::Done;
    for (i, chunk) in chunks.iter().enumerate() {
        pending.extend_from_slice(chunk);
        let mut out = vec![0u16; pending.len()];
        let result = transcode_to_utf16(&pending, &mut out, i + 1 == chunks.len(), behavior);
        streamed.extend_from_slice(&out[..result.written]);
        pending.drain(..result.consumed);
        status = result.status;
        if status == OperationStatus::InvalidData {
            break;
        }
    }
    assert_eq!(status, expected.status);
    assert_eq!(streamed, whole[..expected.written]);

    if expected.is_done() && behavior != InvalidSequenceBehavior::LeaveUnchanged {
        let mut utf8 = vec![0u8; 3 * expected.written];
        let back = transcode_from_utf16(
            &whole[..expected.written],
            &mut utf8,
            true,
            InvalidSequenceBehavior::Fail,
        );
        assert!(back.is_done());
        if behavior == InvalidSequenceBehavior::Fail {
            assert_eq!(&utf8[..back.written], input.bytes.as_slice());
        }
    }
}

/// The streaming validator agrees with the standard library.
fn check_validator(input: &Input) {
    let sizes: Vec<usize> = input.sizes.iter().map(|&s| usize::from(s)).collect();
    let chunks = split_by_sizes(&input.bytes, &sizes);
    let mut validator = Utf8StreamingValidator::new();
    let mut verdict = true;
    for (i, chunk) in chunks.iter().enumerate() {
        verdict = validator.try_consume(chunk, i + 1 == chunks.len());
    }
    assert_eq!(verdict, std::str::from_utf8(&input.bytes).is_ok());
}

/// Uppercasing keeps ignore-case equality and the ignore-case hash.
fn check_hash(input: &Input) {
    let mut upper = vec![0u8; 2 * input.bytes.len()];
    let result = change_case::to_upper_invariant(
        &input.bytes,
        &mut upper,
        true,
        InvalidSequenceBehavior::LeaveUnchanged,
    );
    assert!(result.is_done());
    let upper = &upper[..result.written];
    assert!(eq_ordinal_ignore_case(&input.bytes, upper));
    assert_eq!(
        hash_utf8(&input.bytes, StringComparison::OrdinalIgnoreCase),
        hash_utf8(upper, StringComparison::OrdinalIgnoreCase)
    );

    let mut propagated = vec![0u16; input.bytes.len()];
    let propagated_result = transcode_to_utf16_propagating(&input.bytes, &mut propagated);
    let mut left = vec![0u16; input.bytes.len()];
    let result = transcode_to_utf16(
        &input.bytes,
        &mut left,
        true,
        InvalidSequenceBehavior::LeaveUnchanged,
    );
    assert_eq!(propagated_result, result);
    assert_eq!(propagated[..propagated_result.written], left[..result.written]);
}

fuzz_target!(|input: Input| {
    check_chunking(&input);
    check_validator(&input);
    check_hash(&input);
});
