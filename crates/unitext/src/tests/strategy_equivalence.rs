use alloc::{vec, vec::Vec};

use quickcheck::QuickCheck;

use super::quickcheck_tests;
use crate::CaseStrategy;

/// Property: every strategy copies the same prefix as the scalar kernel,
/// for any output length and either direction. Input is biased towards
/// ASCII, with DEL and high bytes rare enough that runs span several
/// registers.
#[test]
fn strategies_agree_on_bytes() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(raw: Vec<u8>, out_len: usize, to_upper: bool) -> bool {
        let input: Vec<u8> = raw
            .iter()
            .map(|&b| match b {
                0x7F | 0x80 | 0xC0 => b,
                _ => b % 0x7F,
            })
            .collect();
        let out_len = out_len % (input.len() + 2);
        let mut expected = vec![0u8; out_len];
        let n = CaseStrategy::Scalar.change_case_bytes(&input, &mut expected, to_upper);
        CaseStrategy::ALL.iter().all(|strategy| {
            let mut out = vec![0u8; out_len];
            let m = strategy.change_case_bytes(&input, &mut out, to_upper);
            m == n && out[..m] == expected[..n]
        })
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u8>, usize, bool) -> bool);
}

/// Property: the same for 16-bit units, biased the same way.
#[test]
fn strategies_agree_on_units() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(raw: Vec<u16>, to_upper: bool) -> bool {
        let input: Vec<u16> = raw
            .iter()
            .map(|&u| if u % 64 == 0 { u } else { u % 0x80 })
            .collect();
        let mut expected = vec![0u16; input.len()];
        let n = CaseStrategy::Scalar.change_case_units(&input, &mut expected, to_upper);
        CaseStrategy::ALL.iter().all(|strategy| {
            let mut out = vec![0u16; input.len()];
            let m = strategy.change_case_units(&input, &mut out, to_upper);
            m == n && out[..m] == expected[..n]
        })
    }

    QuickCheck::new()
        .tests(quickcheck_tests())
        .quickcheck(prop as fn(Vec<u16>, bool) -> bool);
}

#[test]
fn strategies_agree_on_every_stop_position() {
    // `@` through `{`, so both letter bounds sit inside the run.
    let letters: Vec<u8> = (0..70u8).map(|i| b'@' + i % 60).collect();
    for stop in 0..=letters.len() {
        for stop_byte in [0x7F, 0x80, 0xFF] {
            let mut input = letters.clone();
            if let Some(b) = input.get_mut(stop) {
                *b = stop_byte;
            }
            for to_upper in [false, true] {
                let mut expected = vec![0u8; input.len()];
                let n = CaseStrategy::Scalar.change_case_bytes(&input, &mut expected, to_upper);
                assert_eq!(n, stop);
                for strategy in CaseStrategy::ALL {
                    let mut out = vec![0u8; input.len()];
                    let m = strategy.change_case_bytes(&input, &mut out, to_upper);
                    assert_eq!((m, &out[..m]), (n, &expected[..n]), "{strategy:?} stop at {stop}");
                }
            }
        }
    }
}
