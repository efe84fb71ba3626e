#![allow(missing_docs)]
#![allow(dead_code)]

use std::time::Duration;

use criterion::Criterion;

/// Mostly-ASCII text with two-, three- and four-byte scalars mixed in, at most
/// `target_len` bytes long.
pub fn make_text_payload(target_len: usize) -> String {
    const PIECES: &[&str] = &["The quick brown fox ", "jumps over ", "the lazy dög ", "€ ", "😀 "];
    let mut s = String::with_capacity(target_len + 8);
    let mut i = 0;
    while s.len() < target_len {
        s.push_str(PIECES[i % PIECES.len()]);
        i += 1;
    }
    while s.len() > target_len {
        s.pop();
    }
    s
}

/// `payload` with every 97th byte replaced by `0xFF`.
pub fn corrupt(payload: &str) -> Vec<u8> {
    let mut bytes = payload.as_bytes().to_vec();
    for b in bytes.iter_mut().step_by(97) {
        *b = 0xFF;
    }
    bytes
}

pub fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(5));
    }
    c
}
