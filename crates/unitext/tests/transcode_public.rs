#![allow(missing_docs)]

use rstest::rstest;
use unitext::{
    InvalidSequenceBehavior, OperationStatus, ScalarError, UnicodeScalar, from_utf16_vec,
    produce_chunks, to_utf16_vec, to_valid_utf8_string, transcode_from_utf16, transcode_to_utf16,
    try_encode_scalar, utf8_len_of_utf16, utf16_len_of_utf8,
};

const SAMPLE: &str = "Ünïcödé: ǅemal, ΑΒΓ, Ꙭ, 𐐀𐐨, 😀 and plain ASCII text";

#[rstest]
#[case(0x24, &[0x24])]
#[case(0xA2, &[0xC2, 0xA2])]
#[case(0x20AC, &[0xE2, 0x82, 0xAC])]
#[case(0x10348, &[0xF0, 0x90, 0x8D, 0x88])]
fn encodes_scalars(#[case] value: i32, #[case] expected: &[u8]) {
    let mut out = [0u8; 4];
    let n = try_encode_scalar(value, &mut out).unwrap();
    assert_eq!(&out[..n], expected);
}

#[rstest]
#[case(-1)]
#[case(0xD800)]
#[case(0xDFFF)]
#[case(0x11_0000)]
fn rejects_non_scalars(#[case] value: i32) {
    let mut out = [0u8; 4];
    assert!(matches!(
        try_encode_scalar(value, &mut out),
        Err(ScalarError::ValueOutOfRange(_))
    ));
    assert_eq!(out, [0; 4]);
}

#[test]
fn sizing_matches_transcoding() {
    let counts = utf16_len_of_utf8(SAMPLE.as_bytes(), InvalidSequenceBehavior::Fail).unwrap();
    assert_eq!(counts.code_units, SAMPLE.encode_utf16().count());
    assert_eq!(counts.scalars, SAMPLE.chars().count());

    let mut utf16 = vec![0u16; counts.code_units];
    let result = transcode_to_utf16(SAMPLE.as_bytes(), &mut utf16, true, InvalidSequenceBehavior::Fail);
    assert!(result.is_done());
    assert_eq!(result.written, utf16.len());

    let back = utf8_len_of_utf16(&utf16, InvalidSequenceBehavior::Fail).unwrap();
    assert_eq!(back.code_units, SAMPLE.len());
}

#[rstest]
fn chunked_transcoding_reassembles(#[values(1, 2, 7, 40, 200)] parts: usize) {
    let mut pending = Vec::new();
    let mut utf16 = Vec::new();
    let chunks = produce_chunks(SAMPLE.as_bytes(), parts);
    for (i, chunk) in chunks.iter().enumerate() {
        pending.extend_from_slice(chunk);
        let mut out = [0u16; 8];
        loop {
            let result = transcode_to_utf16(
                &pending,
                &mut out,
                i + 1 == chunks.len(),
                InvalidSequenceBehavior::Fail,
            );
            utf16.extend_from_slice(&out[..result.written]);
            pending.drain(..result.consumed);
            match result.status {
                OperationStatus::DestinationTooSmall => continue,
                OperationStatus::Done | OperationStatus::NeedMoreData => break,
                OperationStatus::InvalidData => panic!("sample is well formed"),
            }
        }
    }
    assert!(pending.is_empty());
    assert_eq!(String::from_utf16(&utf16).unwrap(), SAMPLE);
}

#[test]
fn transcoding_into_tiny_buffers_makes_progress() {
    let utf16: Vec<u16> = SAMPLE.encode_utf16().collect();
    let mut rest = utf16.as_slice();
    let mut utf8 = Vec::new();
    let mut out = [0u8; 4];
    while !rest.is_empty() {
        let result = transcode_from_utf16(rest, &mut out, true, InvalidSequenceBehavior::Fail);
        assert!(result.consumed > 0);
        utf8.extend_from_slice(&out[..result.written]);
        rest = &rest[result.consumed..];
    }
    assert_eq!(utf8, SAMPLE.as_bytes());
}

#[test]
fn owned_conversions_report_errors() {
    assert_eq!(from_utf16_vec(&to_utf16_vec(SAMPLE.as_bytes()).unwrap()).unwrap(), SAMPLE);

    let err = to_utf16_vec(b"abc\xF0\x9F\x98!").unwrap_err();
    assert_eq!(err.offset, 3);
    assert_eq!(err.bytes, [0xF0, 0x9F, 0x98]);
    assert!(err.to_string().ends_with("at offset 3"));

    let err = from_utf16_vec(&[0x41, 0xDBFF]).unwrap_err();
    assert_eq!(err.to_string(), "invalid sequence [DBFF] at offset 1");

    assert_eq!(to_valid_utf8_string(b"\xF0\x9F\x98\x80\xF0\x9F"), "😀\u{FFFD}");
}

#[test]
fn scalars_convert_to_and_from_char() {
    let scalar = UnicodeScalar::from_char('ǅ');
    assert_eq!(scalar.value(), 0x01C5);
    assert_eq!(scalar.to_char(), 'ǅ');
    assert_eq!(scalar.utf8_len(), 2);
    assert_eq!(scalar.utf16_len(), 1);
    assert!(UnicodeScalar::new(0xDC00).is_err());
}
